use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::render;

use super::{analysis_status, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct DashboardQuery {
    pub youtube_link: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DashboardForm {
    pub youtube_link: Option<String>,
}

/// First non-blank candidate, in priority order.
fn pick_link<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|link| !link.trim().is_empty())
}

pub(super) async fn home() -> Html<String> {
    Html(render::home())
}

pub(super) async fn dashboard_get(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let link = pick_link([query.youtube_link, query.link]);
    render_dashboard(&state, link).await
}

pub(super) async fn dashboard_post(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
    form: Result<Form<DashboardForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "dashboard POST without a readable form body");
            DashboardForm::default()
        }
    };
    let link = pick_link([form.youtube_link, query.youtube_link, query.link]);
    render_dashboard(&state, link).await
}

async fn render_dashboard(state: &AppState, link: Option<String>) -> Response {
    match state.analyzer.analyze(link.as_deref()).await {
        Ok(report) => Html(render::dashboard(&report)).into_response(),
        Err(e) => {
            let status = analysis_status(&e);
            if status == StatusCode::BAD_GATEWAY {
                tracing::warn!(error = %e, "dashboard analysis failed upstream");
            } else {
                tracing::error!(error = %e, "dashboard analysis failed");
            }
            (status, Html(render::error(&e.client_message()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_field_beats_query_parameter() {
        assert_eq!(
            pick_link([
                Some("https://youtu.be/form".to_string()),
                Some("https://youtu.be/query".to_string()),
            ]),
            Some("https://youtu.be/form".to_string())
        );
    }

    #[test]
    fn blank_form_field_falls_through() {
        assert_eq!(
            pick_link([Some("  ".to_string()), None, Some("https://youtu.be/q".to_string())]),
            Some("https://youtu.be/q".to_string())
        );
    }

    #[test]
    fn no_candidates_means_no_link() {
        assert_eq!(pick_link([None, Some(String::new())]), None);
    }
}
