pub mod api;
pub mod browser;
pub mod fetcher;
pub mod page;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use api::ApiAcquirer;
pub use browser::ChromeRenderer;
pub use fetcher::ReqwestTransport;
pub use page::{ScrapeAcquirer, ScrapeJob};
pub use traits::PriceAcquirer;
