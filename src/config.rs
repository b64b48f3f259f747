use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Externally supplied checkout configuration.
///
/// Loaded from a TOML file with serde defaults for every field, then
/// optionally overridden from `COURSEPAY_*` environment variables. The GST
/// rate, workshop session count, and gateway key are configuration, never
/// computed by the flow itself. `workshop_sessions` is the session count
/// applied to workshop rows whose snapshot omits one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub gateway_key_id: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_gst_rate")]
    pub gst_rate_percent: u32,
    #[serde(default = "default_workshop_sessions")]
    pub workshop_sessions: u32,
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,
}

fn default_api_base_url() -> String {
    "https://api.coursepay.app".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_gst_rate() -> u32 {
    18
}

fn default_workshop_sessions() -> u32 {
    1
}

fn default_merchant_name() -> String {
    "CoursePay".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            gateway_key_id: String::new(),
            currency: default_currency(),
            gst_rate_percent: default_gst_rate(),
            workshop_sessions: default_workshop_sessions(),
            merchant_name: default_merchant_name(),
        }
    }
}

impl CheckoutConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CheckoutError::ConfigError(format!("TOML parsing error: {e}")))
    }

    /// Applies `COURSEPAY_*` environment overrides on top of the loaded
    /// values. Numeric overrides that do not parse are rejected rather than
    /// silently ignored.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = env::var("COURSEPAY_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Ok(v) = env::var("COURSEPAY_GATEWAY_KEY_ID") {
            self.gateway_key_id = v;
        }
        if let Ok(v) = env::var("COURSEPAY_CURRENCY") {
            self.currency = v;
        }
        if let Ok(v) = env::var("COURSEPAY_GST_RATE") {
            self.gst_rate_percent = parse_override("COURSEPAY_GST_RATE", &v)?;
        }
        if let Ok(v) = env::var("COURSEPAY_WORKSHOP_SESSIONS") {
            self.workshop_sessions = parse_override("COURSEPAY_WORKSHOP_SESSIONS", &v)?;
        }
        if let Ok(v) = env::var("COURSEPAY_MERCHANT_NAME") {
            self.merchant_name = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(CheckoutError::ConfigError(
                "api_base_url must not be empty".to_string(),
            ));
        }
        if self.gst_rate_percent >= 100 {
            return Err(CheckoutError::ConfigError(format!(
                "gst_rate_percent must be below 100, got {}",
                self.gst_rate_percent
            )));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CheckoutError::ConfigError(format!(
                "currency must be a three-letter ISO code, got {:?}",
                self.currency
            )));
        }
        if self.workshop_sessions == 0 {
            return Err(CheckoutError::ConfigError(
                "workshop_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_override(name: &str, value: &str) -> Result<u32> {
    value.parse().map_err(|_| {
        CheckoutError::ConfigError(format!("{name} must be an integer, got {value:?}"))
    })
}
