use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use ytsent_sentiment::AnalysisReport;

use crate::middleware::RequestId;

use super::{map_analysis_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalysisQuery {
    pub link: Option<String>,
}

pub(super) async fn get_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<ApiResponse<AnalysisReport>>, ApiError> {
    let link = query.link.as_deref().map(str::trim).filter(|l| !l.is_empty());
    let Some(link) = link else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query parameter `link` is required",
        ));
    };

    let data = state
        .analyzer
        .analyze(Some(link))
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
