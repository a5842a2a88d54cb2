pub mod product_json;
pub mod storefront_parser;
