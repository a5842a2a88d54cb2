// Storefront product-card extraction via an ordered selector cascade
use crate::model::{NOT_AVAILABLE, ScrapeError};
use crate::utils::absolutize;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

/// One markup convention: a product card and where its title/price live inside it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectorGroup {
    pub container: String,
    pub title: String,
    pub price: String,
}

impl SelectorGroup {
    fn new(container: &str, title: &str, price: &str) -> Self {
        Self {
            container: container.into(),
            title: title.into(),
            price: price.into(),
        }
    }
}

/// Tried in this order; the list is tunable through `selector_groups` in the config.
pub fn default_selector_groups() -> Vec<SelectorGroup> {
    vec![
        SelectorGroup::new(
            ".pd-g-product-card-v2",
            ".pd-g-product-card-v2__name, .product-card-v2__name",
            ".pd-g-product-card-v2__price-current, .product-card-v2__price-current",
        ),
        SelectorGroup::new(
            "[class*='product-card']",
            "[class*='name'], [class*='title'], h3, h2",
            "[class*='price']",
        ),
        SelectorGroup::new(
            "[data-product-id], [data-modelcode]",
            "[class*='name'], [class*='title'], h3",
            "[class*='price']",
        ),
        SelectorGroup::new(
            "li[class*='product'], div[class*='product-item']",
            "h2, h3, h4, a",
            "[class*='price'], span",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedProduct {
    pub title: String,
    pub price: String,
    pub url: String,
}

#[derive(Debug)]
pub struct Extraction {
    /// Index of the group that matched.
    pub group_index: usize,
    pub products: Vec<ScrapedProduct>,
}

struct CompiledGroup {
    container: Selector,
    title: Selector,
    price: Selector,
}

pub struct StorefrontParser {
    groups: Vec<CompiledGroup>,
    anchor: Selector,
    max_products: usize,
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Selector(selector.to_string(), e.to_string()))
}

fn first_text(container: ElementRef, selector: &Selector) -> String {
    container
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl StorefrontParser {
    pub fn new(groups: &[SelectorGroup], max_products: usize) -> Result<Self, ScrapeError> {
        let groups = groups
            .iter()
            .map(|g| {
                Ok(CompiledGroup {
                    container: compile(&g.container)?,
                    title: compile(&g.title)?,
                    price: compile(&g.price)?,
                })
            })
            .collect::<Result<Vec<_>, ScrapeError>>()?;

        Ok(Self {
            groups,
            anchor: compile("a[href]")?,
            max_products,
        })
    }

    /// Returns `None` when no group matches a single container.
    /// The first group with a match wins; later groups are never consulted.
    pub fn parse(&self, html: &str, origin: Option<&str>) -> Option<Extraction> {
        let document = Html::parse_document(html);

        let (group_index, group) = self
            .groups
            .iter()
            .enumerate()
            .find(|(_, g)| document.select(&g.container).next().is_some())?;

        let products = document
            .select(&group.container)
            .take(self.max_products)
            .map(|container| ScrapedProduct {
                title: first_text(container, &group.title),
                price: first_text(container, &group.price),
                url: self.link(container, origin),
            })
            .filter(|p| p.title != NOT_AVAILABLE || p.price != NOT_AVAILABLE)
            .collect();

        Some(Extraction {
            group_index,
            products,
        })
    }

    fn link(&self, container: ElementRef, origin: Option<&str>) -> String {
        let href = if container.value().name() == "a" {
            container.value().attr("href")
        } else {
            container
                .select(&self.anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
        };

        match href.map(str::trim).filter(|h| !h.is_empty()) {
            Some(href) => absolutize(href, origin),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}
