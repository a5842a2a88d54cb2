// Interpretation of the product-info API payload
use crate::model::{FetchError, NOT_AVAILABLE};
use serde_json::Value;

pub const SUCCESS_CODE: &str = "0000";
pub const UNKNOWN_STOCK: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub price: String,
    pub price_formatted: String,
    pub stock_status: String,
}

/// Zero, null, empty strings and empty containers count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Promotional value when present and truthy, otherwise the regular one as-is
/// (zero and empty included), `N/A` only when the regular one is absent or null.
pub fn prefer_promotion(promotion: Option<&Value>, regular: Option<&Value>) -> String {
    promotion
        .filter(|v| is_truthy(v))
        .or(regular.filter(|v| !v.is_null()))
        .map(value_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Validates the envelope and resolves price, display price and stock label.
pub fn interpret(payload: &Value) -> Result<ProductInfo, FetchError> {
    let envelope = payload
        .as_object()
        .ok_or_else(|| FetchError::Parse("expected a JSON object".into()))?;

    let succeeded = envelope.get("resultCode").and_then(Value::as_str) == Some(SUCCESS_CODE);
    let product = match envelope.get("productDatas").and_then(Value::as_array) {
        Some(datas) if succeeded && !datas.is_empty() => &datas[0],
        _ => return Err(FetchError::NoData),
    };

    let product = product
        .as_object()
        .ok_or_else(|| FetchError::Parse("productDatas[0] is not an object".into()))?;

    let price = prefer_promotion(product.get("promotionPrice"), product.get("price"));
    let price_formatted = prefer_promotion(
        product.get("promotionPriceFormatted"),
        product.get("priceFormatted"),
    );
    let stock_status = product
        .get("stockLevelStatusDisplay")
        .filter(|v| !v.is_null())
        .map(value_text)
        .unwrap_or_else(|| UNKNOWN_STOCK.to_string());

    Ok(ProductInfo {
        price,
        price_formatted,
        stock_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn promotion_price_wins() {
        let info = interpret(&json!({
            "resultCode": "0000",
            "productDatas": [{
                "promotionPrice": 999.99,
                "price": 1299.0,
                "promotionPriceFormatted": "RM 999.99",
                "priceFormatted": "RM 1,299.00",
                "stockLevelStatusDisplay": "In Stock"
            }]
        }))
        .unwrap();
        assert_eq!(
            info,
            ProductInfo {
                price: "999.99".into(),
                price_formatted: "RM 999.99".into(),
                stock_status: "In Stock".into(),
            }
        );
    }

    #[test]
    fn regular_price_when_promotion_is_zero_or_missing() {
        let zero = interpret(&json!({
            "resultCode": "0000",
            "productDatas": [{"promotionPrice": 0, "price": 1299, "priceFormatted": "RM 1,299"}]
        }))
        .unwrap();
        assert_eq!(zero.price, "1299");
        assert_eq!(zero.price_formatted, "RM 1,299");

        let missing = interpret(&json!({
            "resultCode": "0000",
            "productDatas": [{"price": 50, "promotionPriceFormatted": null}]
        }))
        .unwrap();
        assert_eq!(missing.price, "50");
        assert_eq!(missing.price_formatted, "N/A");
    }

    #[test]
    fn zero_regular_price_is_kept() {
        let info = interpret(&json!({
            "resultCode": "0000",
            "productDatas": [{"promotionPrice": null, "price": 0, "priceFormatted": ""}]
        }))
        .unwrap();
        assert_eq!(info.price, "0");
        assert_eq!(info.price_formatted, "");

        let null_regular = interpret(&json!({
            "resultCode": "0000",
            "productDatas": [{"promotionPrice": 0, "price": null}]
        }))
        .unwrap();
        assert_eq!(null_regular.price, "N/A");
    }

    #[test]
    fn no_prices_at_all_is_not_available() {
        let info = interpret(&json!({"resultCode": "0000", "productDatas": [{}]})).unwrap();
        assert_eq!(info.price, "N/A");
        assert_eq!(info.price_formatted, "N/A");
        assert_eq!(info.stock_status, "Unknown");
    }

    #[test]
    fn missing_discriminator_or_products_is_no_data() {
        for payload in [
            json!({"resultCode": "9999", "productDatas": [{"price": 1}]}),
            json!({"resultCode": "0000", "productDatas": []}),
            json!({"resultCode": "0000"}),
            json!({"productDatas": [{"price": 1}]}),
        ] {
            assert!(matches!(interpret(&payload), Err(FetchError::NoData)), "{payload}");
        }
    }

    #[test]
    fn wrong_shapes_are_parse_errors() {
        assert!(matches!(interpret(&json!([1, 2])), Err(FetchError::Parse(_))));
        assert!(matches!(
            interpret(&json!({"resultCode": "0000", "productDatas": ["oops"]})),
            Err(FetchError::Parse(_))
        ));
    }
}
