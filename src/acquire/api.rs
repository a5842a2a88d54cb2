// Structured-API acquisition: one GET per product code
use crate::acquire::traits::{HttpTransport, PriceAcquirer};
use crate::model::{API_HEADER, AcquisitionBatch, FetchError, ProductRecord, TransportError};
use crate::parser::product_json::{ProductInfo, interpret};
use crate::utils::{capture_timestamp, is_json_content_type, preview, site_origin};
use std::time::Duration;
use tracing::{info, warn};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const ACCEPT: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub struct ApiAcquirer<T: HttpTransport> {
    transport: T,
    endpoint: String,
    product_codes: Vec<String>,
    headers: Vec<(String, String)>,
}

/// `{code}` in the endpoint is replaced; otherwise the code goes into `productCodes`.
pub fn product_url(endpoint: &str, code: &str) -> String {
    let code = urlencoding::encode(code);
    if endpoint.contains("{code}") {
        return endpoint.replace("{code}", &code);
    }
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}productCodes={}", endpoint, separator, code)
}

/// Headers a storefront page would send, so the API answers with JSON rather than a bot wall.
pub fn browser_headers(endpoint: &str) -> Vec<(String, String)> {
    let mut headers = vec![
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Accept".to_string(), ACCEPT.to_string()),
        ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
    ];
    if let Some(origin) = site_origin(endpoint) {
        headers.push(("Referer".to_string(), format!("{}/", origin)));
        headers.push(("Origin".to_string(), origin));
    }
    headers
}

impl<T: HttpTransport> ApiAcquirer<T> {
    pub fn new(transport: T, endpoint: impl Into<String>, product_codes: Vec<String>) -> Self {
        let endpoint = endpoint.into();
        let headers = browser_headers(&endpoint);
        Self {
            transport,
            endpoint,
            product_codes,
            headers,
        }
    }

    async fn fetch_one(&self, code: &str) -> Result<ProductInfo, FetchError> {
        let url = product_url(&self.endpoint, code);
        let response = self
            .transport
            .get(&url, &self.headers, REQUEST_TIMEOUT)
            .await?;

        if !response.is_success() {
            let reason = format!("HTTP status {} for {}", response.status, url);
            return Err(TransportError::Http(reason).into());
        }

        let content_type = response.content_type.clone().unwrap_or_default();
        if !is_json_content_type(&content_type) {
            return Err(FetchError::NonJsonResponse {
                content_type: if content_type.is_empty() {
                    "unknown".into()
                } else {
                    content_type
                },
                preview: preview(&response.body),
            });
        }

        let payload: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| FetchError::Parse(e.to_string()))?;
        interpret(&payload)
    }
}

#[async_trait::async_trait]
impl<T: HttpTransport> PriceAcquirer for ApiAcquirer<T> {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn acquire(&self) -> AcquisitionBatch {
        let mut batch = AcquisitionBatch::new(API_HEADER);

        if self.product_codes.is_empty() {
            warn!("No product codes configured");
            return batch;
        }

        info!("Fetching prices for {} products...", self.product_codes.len());

        for code in &self.product_codes {
            info!("Fetching: {}", code);
            let outcome = self.fetch_one(code).await;
            let timestamp = capture_timestamp();

            let record = match outcome {
                Ok(product) => {
                    info!(
                        "  ✓ {}: {} ({})",
                        code, product.price_formatted, product.stock_status
                    );
                    ProductRecord {
                        timestamp,
                        identifier: code.clone(),
                        price: product.price,
                        price_formatted: product.price_formatted,
                        status: product.stock_status,
                    }
                }
                Err(e) => {
                    if let FetchError::NonJsonResponse { preview, .. } = &e {
                        warn!("  Response preview: {}", preview);
                    }
                    warn!("  ✗ {}: {}", code, e);
                    ProductRecord::failed(timestamp, code.clone(), e.to_status())
                }
            };
            batch.records.push(record);
        }

        info!(
            "Fetched {} products ({} failed)",
            batch.len(),
            batch.failed_count()
        );
        batch
    }
}
