use crate::error::{AppError, Result};

use super::Config;

/// Validate a loaded configuration and surface every issue at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_endpoint(&config.provider.endpoint, &mut issues);

    if config.provider.api_key_env.trim().is_empty() {
        issues.push("api_key_env must not be empty".to_string());
    }
    if config.provider.user_agent.trim().is_empty() {
        issues.push("user_agent must not be empty".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_endpoint(endpoint: &str, issues: &mut Vec<String>) {
    if endpoint.is_empty() {
        issues.push("endpoint must not be empty".to_string());
        return;
    }

    match reqwest::Url::parse(endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            if url.query().is_some() {
                issues.push(format!("endpoint `{endpoint}` must not carry a query string"));
            }
        }
        Ok(url) => issues.push(format!(
            "endpoint `{endpoint}` uses unsupported scheme `{}`",
            url.scheme()
        )),
        Err(err) => issues.push(format!("endpoint `{endpoint}` is not a valid URL: {err}")),
    }
}
