use crate::model::{ConfigError, DestinationDescriptor, is_placeholder};
use crate::parser::storefront_parser::{SelectorGroup, default_selector_groups};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_API_ENDPOINT: &str =
    "https://shop.samsung.com/my/multistore/my_epp/eppsme/servicesv2/getSimpleProductsInfo";
pub const SHEET_ID_ENV: &str = "GOOGLE_SHEET_ID";
pub const CREDENTIALS_ENV: &str = "GOOGLE_CREDENTIALS";
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Api,
    Scrape,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub product_codes: Vec<String>,
    #[serde(default)]
    pub google_sheet_id: String,
    #[serde(default = "default_worksheet_name")]
    pub worksheet_name: String,
    /// Seconds to let the rendered page settle.
    #[serde(default = "default_scrape_delay")]
    pub scrape_delay: u64,
    #[serde(default = "default_max_products")]
    pub max_products: usize,
    #[serde(default = "default_selector_groups")]
    pub selector_groups: Vec<SelectorGroup>,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

fn default_worksheet_name() -> String {
    "Prices".into()
}

fn default_scrape_delay() -> u64 {
    5
}

fn default_max_products() -> usize {
    50
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("service_account.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Api,
            api_endpoint: Some(DEFAULT_API_ENDPOINT.into()),
            target_url: None,
            product_codes: Vec::new(),
            google_sheet_id: String::new(),
            worksheet_name: default_worksheet_name(),
            scrape_delay: default_scrape_delay(),
            max_products: default_max_products(),
            selector_groups: default_selector_groups(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl AppConfig {
    pub fn destination(&self) -> DestinationDescriptor {
        DestinationDescriptor::new(self.google_sheet_id.clone(), self.worksheet_name.clone())
    }

    pub fn api_endpoint(&self) -> Result<&str, ConfigError> {
        self.api_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Missing("api_endpoint is required for the api strategy".into())
            })
    }

    pub fn target_url(&self) -> Result<&str, ConfigError> {
        self.target_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Missing("target_url is required for the scrape strategy".into())
            })
    }
}

/// Where the service-account key comes from. Chosen once, then handed to the auth step.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    Inline(String),
    File(PathBuf),
}

/// Inline credentials from the environment win over the key file.
pub fn resolve_credentials(inline: Option<String>, file: PathBuf) -> CredentialSource {
    match inline.filter(|c| !c.trim().is_empty()) {
        Some(json) => CredentialSource::Inline(json),
        None => CredentialSource::File(file),
    }
}

/// The configured sheet id is kept unless it is empty or a placeholder.
pub fn resolve_sheet_id(configured: &str, from_env: Option<String>) -> String {
    let configured = configured.trim();
    if !configured.is_empty() && !is_placeholder(configured) {
        return configured.to_string();
    }
    match from_env.filter(|v| !v.trim().is_empty()) {
        Some(value) => value.trim().to_string(),
        None => {
            if is_placeholder(configured) {
                warn!(
                    "google_sheet_id '{}' is a placeholder and {} is not set",
                    configured, SHEET_ID_ENV
                );
            }
            String::new()
        }
    }
}

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => parse_config(path, &content)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        }
        Err(e) => return Err(ConfigError::Io(path.to_string(), e)),
    };

    config.google_sheet_id =
        resolve_sheet_id(&config.google_sheet_id, std::env::var(SHEET_ID_ENV).ok());
    Ok(config)
}

fn parse_config(path: &str, content: &str) -> Result<AppConfig, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::Invalid(path.to_string(), e))
}
