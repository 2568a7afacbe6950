//! Common types and data structures

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::fmt;
use tracing::{debug, warn};

/// Whole floats print without a trailing `.0` (`10.0` shows as `10`)
fn write_number(f: &mut fmt::Formatter<'_>, n: &Number) -> fmt::Result {
    match n.as_f64() {
        Some(x) if n.is_f64() => write!(f, "{}", x),
        _ => write!(f, "{}", n),
    }
}

/// Product identifier as sent by the catalog (number or string)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(Number),
    Text(String),
    /// null, bool or anything else; keyed by its JSON text
    Other(Value),
}

impl Default for ProductId {
    fn default() -> Self {
        ProductId::Text(String::new())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write_number(f, n),
            ProductId::Text(s) => f.write_str(s),
            ProductId::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Field that is only ever displayed, so numbers and strings are both fine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(Number),
    Text(String),
    Other(Value),
}

impl DisplayValue {
    fn text(s: &str) -> Self {
        DisplayValue::Text(s.to_string())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => write_number(f, n),
            DisplayValue::Text(s) => f.write_str(s),
            DisplayValue::Other(Value::Null) => Ok(()),
            DisplayValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Catalog entry from the remote JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: String,
    #[serde(default = "default_price")]
    pub price: DisplayValue,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default = "default_rating")]
    pub rating: DisplayValue,
    #[serde(default = "default_stock")]
    pub stock: DisplayValue,
}

impl Product {
    /// List key: string form of the id
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

fn default_price() -> DisplayValue {
    DisplayValue::Number(Number::from(0))
}

fn default_rating() -> DisplayValue {
    DisplayValue::text("")
}

fn default_stock() -> DisplayValue {
    DisplayValue::text("0")
}

/// Any JSON value as display text; null becomes empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(DisplayValue::deserialize(deserializer)?.to_string())
}

/// Parse a catalog response body.
///
/// The body has to be JSON. A missing or non-array `products` field is an
/// empty catalog, and entries that are not objects are skipped.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<Product>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;

    let Some(entries) = value.get("products").and_then(Value::as_array) else {
        debug!("Response has no products array, treating as empty");
        return Ok(Vec::new());
    };

    let products = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            if !entry.is_object() {
                warn!(index = idx, "Skipping non-object catalog entry");
                return None;
            }
            match Product::deserialize(entry) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(index = idx, error = %e, "Skipping malformed catalog entry");
                    None
                }
            }
        })
        .collect();

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHOE: &str = r#"{"products":[{"id":1,"title":"Shoe","thumbnail":"http://x/a.png","price":49,"category":"Footwear","rating":4.5,"stock":10}]}"#;

    #[test]
    fn parses_full_entry() {
        let products = parse_catalog(SHOE.as_bytes()).unwrap();
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.key(), "1");
        assert_eq!(p.title, "Shoe");
        assert_eq!(p.thumbnail, "http://x/a.png");
        assert_eq!(p.price.to_string(), "49");
        assert_eq!(p.category, "Footwear");
        assert_eq!(p.rating.to_string(), "4.5");
        assert_eq!(p.stock.to_string(), "10");
    }

    #[test]
    fn missing_products_is_empty() {
        assert!(parse_catalog(b"{}").unwrap().is_empty());
        assert!(parse_catalog(br#"{"products":"nope"}"#).unwrap().is_empty());
        assert!(parse_catalog(br#"{"products":null}"#).unwrap().is_empty());
        assert!(parse_catalog(b"[]").unwrap().is_empty());
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(parse_catalog(b"<html>502</html>").is_err());
        assert!(parse_catalog(b"").is_err());
    }

    #[test]
    fn numeric_and_string_ids_share_a_key() {
        let body = br#"{"products":[{"id":1},{"id":"1"}]}"#;
        let products = parse_catalog(body).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].key(), "1");
        assert_eq!(products[1].key(), "1");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let products = parse_catalog(br#"{"products":[{"id":7,"title":null}]}"#).unwrap();
        let p = &products[0];
        assert_eq!(p.title, "");
        assert_eq!(p.thumbnail, "");
        assert_eq!(p.price.to_string(), "0");
        assert_eq!(p.rating.to_string(), "");
        assert_eq!(p.stock.to_string(), "0");
    }

    #[test]
    fn skips_entries_that_are_not_objects() {
        let body = br#"{"products":[1,"two",[3],{"id":4}]}"#;
        let products = parse_catalog(body).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].key(), "4");
    }

    #[test]
    fn mistyped_fields_are_coerced_not_dropped() {
        let body = br#"{"products":[{"id":null,"title":5,"category":3,"thumbnail":true},{"id":false}]}"#;
        let products = parse_catalog(body).unwrap();
        assert_eq!(products.len(), 2);
        let p = &products[0];
        assert_eq!(p.key(), "null");
        assert_eq!(p.title, "5");
        assert_eq!(p.category, "3");
        assert_eq!(p.thumbnail, "true");
        assert_eq!(products[1].key(), "false");
    }

    #[test]
    fn whole_floats_print_like_integers() {
        let body = br#"{"products":[{"id":1.0,"price":10.0,"rating":4.5,"stock":3.0,"title":2.0}]}"#;
        let p = &parse_catalog(body).unwrap()[0];
        assert_eq!(p.key(), "1");
        assert_eq!(p.price.to_string(), "10");
        assert_eq!(p.rating.to_string(), "4.5");
        assert_eq!(p.stock.to_string(), "3");
        assert_eq!(p.title, "2");
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let body = br#"{"products":[{"id":2,"title":"a"},{"id":2,"title":"b"}]}"#;
        let products = parse_catalog(body).unwrap();
        assert_eq!(products.len(), 2);
    }
}
