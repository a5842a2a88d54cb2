use crate::model::{AcquisitionBatch, TransportError};
use std::time::Duration;

/// A way of obtaining one run's worth of price records.
///
/// Implementations never fail as a whole: problems are folded into the
/// returned records so the batch can still be synchronized.
#[async_trait::async_trait]
pub trait PriceAcquirer: Send + Sync {
    fn name(&self) -> &'static str;
    async fn acquire(&self) -> AcquisitionBatch;
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Plain GET; transport failures come back as `Err`, odd content as `Ok`.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}
