//! AI provider preflight check.

use super::CheckResult;
use crate::models::config::{AiConfig, AiProvider};
use crate::services::ai::AiClient;

/// Check that the configured AI provider answers.
pub async fn check(config: &AiConfig) -> CheckResult {
    let name = format!("AI ({})", config.provider);

    if !config.is_usable() {
        return CheckResult::fail(
            &name,
            "API key not configured",
            "Set [ai].api_key or MEDIA_RENAMER_AI_API_KEY, or disable [ai]",
        );
    }

    let client = match AiClient::new(config) {
        Ok(client) => client,
        Err(e) => return CheckResult::fail(&name, &e.to_string(), "Check the [ai] section"),
    };

    match client.health_check().await {
        Ok(true) => CheckResult::ok(&name, &format!("reachable (model: {})", client.model())),
        Ok(false) | Err(_) => {
            let hint = match config.provider {
                AiProvider::Ollama => "Start Ollama: ollama serve",
                _ => "Check [ai].base_url, [ai].api_key and your network connection",
            };
            CheckResult::fail(&name, "not reachable", hint)
        }
    }
}
