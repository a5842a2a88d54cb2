use crate::acquire::traits::{HttpTransport, TransportResponse};
use crate::model::TransportError;
use crate::utils::{PREVIEW_CHARS, is_json_content_type};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Upper bound on a JSON body kept in memory; larger ones are cut and fail to parse.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;
/// Non-JSON bodies are only ever previewed, so keep just enough bytes for the preview.
pub const NON_JSON_BODY_BYTES: usize = PREVIEW_CHARS * 4;

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self { client })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name =
            HeaderName::from_str(key).map_err(|_| TransportError::InvalidHeader(key.clone()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader(key.clone()))?;
        map.append(name, value);
    }
    Ok(map)
}

fn body_limit(content_type: Option<&str>) -> usize {
    match content_type {
        Some(ct) if is_json_content_type(ct) => MAX_BODY_BYTES,
        _ => NON_JSON_BODY_BYTES,
    }
}

/// Appends what fits of `chunk` below `limit`. Returns false once the buffer is full.
fn push_capped(buf: &mut Vec<u8>, chunk: &[u8], limit: usize) -> bool {
    let room = limit.saturating_sub(buf.len());
    buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    buf.len() < limit
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else {
        TransportError::Http(e.to_string())
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let mut response = self
            .client
            .get(url)
            .headers(header_map(headers)?)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        debug!("{:?}", response);

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let limit = body_limit(content_type.as_deref());
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            if !push_capped(&mut bytes, &chunk, limit) {
                debug!("Body of {} cut at {} bytes", url, limit);
                break;
            }
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
