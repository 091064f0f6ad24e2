use crate::error::{NotetakerError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: String,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-4o-mini".to_string(),
                env_var: "OPENAI_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast".to_string(),
                env_var: "XAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-2.5-flash".to_string(),
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    /// Provider config with the default model replaced when `model` is given.
    pub fn config_with_model(&self, model: Option<&str>) -> ProviderConfig {
        let mut config = self.config();
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        config
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
            Provider::Gemini => "Gemini",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Provider::Openai => "openai",
            Provider::Grok => "grok",
            Provider::Gemini => "gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| NotetakerError::MissingApiKey {
            env_var: config.env_var.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_override_replaces_default() {
        let config = Provider::Openai.config_with_model(Some(" gpt-4o "));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.env_var, "OPENAI_API_KEY");
    }

    #[test]
    fn blank_model_keeps_default() {
        let config = Provider::Grok.config_with_model(Some("  "));
        assert_eq!(config.model, "grok-4-fast");
    }
}
