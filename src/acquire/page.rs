// Page-scraping acquisition: render once, extract many product cards
use crate::acquire::browser::{PageRenderer, VIEWPORT};
use crate::acquire::traits::PriceAcquirer;
use crate::model::{AcquisitionBatch, ProductRecord, SCRAPE_HEADER, ScrapeError};
use crate::parser::storefront_parser::{SelectorGroup, StorefrontParser};
use crate::utils::{capture_timestamp, site_origin};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

pub const WAIT_SELECTOR: &str = "div";
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MANUAL_REVIEW: &str = "No products found - manual review required";

#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub target_url: String,
    pub settle_delay: Duration,
    pub selector_groups: Vec<SelectorGroup>,
    pub max_products: usize,
}

impl ScrapeJob {
    fn run(&self, renderer: &dyn PageRenderer) -> Result<Vec<ProductRecord>, ScrapeError> {
        let parser = StorefrontParser::new(&self.selector_groups, self.max_products)?;

        let html = {
            let mut session = renderer.open(VIEWPORT)?;
            info!("Loading {}", self.target_url);
            session.navigate(&self.target_url)?;
            if !self.settle_delay.is_zero() {
                thread::sleep(self.settle_delay);
            }
            if let Err(e) = session.wait_for_element(WAIT_SELECTOR, WAIT_TIMEOUT) {
                warn!("Page content did not appear in time, extracting anyway: {}", e);
            }
            session.content()?
        };

        let origin = site_origin(&self.target_url);
        let Some(extraction) = parser.parse(&html, origin.as_deref()) else {
            warn!("No selector group matched; flagging {} for manual review", self.target_url);
            return Ok(vec![ProductRecord::failed(
                capture_timestamp(),
                MANUAL_REVIEW,
                self.target_url.clone(),
            )]);
        };

        info!(
            "Selector group #{} matched, {} products kept",
            extraction.group_index + 1,
            extraction.products.len()
        );

        Ok(extraction
            .products
            .into_iter()
            .map(|product| {
                info!("  ✓ {}: {}", product.title, product.price);
                ProductRecord {
                    timestamp: capture_timestamp(),
                    identifier: product.title,
                    price_formatted: product.price.clone(),
                    price: product.price,
                    status: product.url,
                }
            })
            .collect())
    }
}

pub struct ScrapeAcquirer {
    renderer: Arc<dyn PageRenderer>,
    job: ScrapeJob,
}

impl ScrapeAcquirer {
    pub fn new(renderer: Arc<dyn PageRenderer>, job: ScrapeJob) -> Self {
        Self { renderer, job }
    }
}

#[async_trait::async_trait]
impl PriceAcquirer for ScrapeAcquirer {
    fn name(&self) -> &'static str {
        "scrape"
    }

    async fn acquire(&self) -> AcquisitionBatch {
        let renderer = Arc::clone(&self.renderer);
        let job = self.job.clone();

        let outcome = tokio::task::spawn_blocking(move || job.run(renderer.as_ref()))
            .await
            .map_err(|e| ScrapeError::Join(e.to_string()))
            .and_then(|result| result);

        let mut batch = AcquisitionBatch::new(SCRAPE_HEADER);
        match outcome {
            Ok(records) => batch.records = records,
            Err(e) => {
                error!("Scrape of {} failed: {}", self.job.target_url, e);
                batch.records.push(ProductRecord::failed(
                    capture_timestamp(),
                    format!("Error: {}", e),
                    self.job.target_url.clone(),
                ));
            }
        }
        batch
    }
}
