use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, MAX_COMMENT_PAGE_SIZE};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Secrets are optional here. A request that needs a missing one fails with a
/// configuration error at that point.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank secrets are treated the same as unset ones.
    let secret = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("YTSENT_ENV", "development"))?;

    let bind_addr = or_default("YTSENT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("YTSENT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("YTSENT_LOG_LEVEL", "info");
    let model_dir = PathBuf::from(or_default("YTSENT_MODEL_DIR", "./models"));

    let youtube_api_key = secret("YOUTUBE_API_KEY");
    let youtube_base_url = or_default(
        "YTSENT_YOUTUBE_BASE_URL",
        "https://www.googleapis.com/youtube/v3",
    );
    let comment_limit = or_default("YTSENT_COMMENT_LIMIT", "100")
        .parse::<u32>()
        .map_err(|e| invalid("YTSENT_COMMENT_LIMIT", e.to_string()))?;
    if !(1..=MAX_COMMENT_PAGE_SIZE).contains(&comment_limit) {
        return Err(invalid(
            "YTSENT_COMMENT_LIMIT",
            format!("must be between 1 and {MAX_COMMENT_PAGE_SIZE}, got {comment_limit}"),
        ));
    }

    let gemini_api_key = secret("GEMINI_API_KEY");
    let google_credentials_json = secret("GOOGLE_APPLICATION_CREDENTIALS_JSON");
    let gemini_base_url = or_default(
        "YTSENT_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com/v1beta",
    );
    let gemini_model = or_default("YTSENT_GEMINI_MODEL", "models/gemini-2.5-flash");

    let request_timeout_secs = or_default("YTSENT_REQUEST_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("YTSENT_REQUEST_TIMEOUT_SECS", e.to_string()))?;
    let user_agent = or_default("YTSENT_USER_AGENT", "ytsent/0.1 (comment-sentiment)");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        model_dir,
        youtube_api_key,
        youtube_base_url,
        comment_limit,
        gemini_api_key,
        google_credentials_json,
        gemini_base_url,
        gemini_model,
        request_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "YTSENT_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
