//! Notify configuration

use serde::Deserialize;

use super::error::ValidationError;

fn default_base_url() -> String {
    "http://localhost:8080/payment/notify".to_string()
}

/// Where minted notify tokens point
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Notify tokens target `{base_url}/{hash}`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl NotifyConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("notify.base_url"));
        }
        Ok(())
    }
}
