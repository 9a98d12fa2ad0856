//! Product catalog
//!
//! Read-only product and category data supplied from outside the dialogue.
//! The state machine only sees the [`CatalogStore`] trait.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Customer rating summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A catalog product. Prices are in store currency (USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: f64,
    pub rating: Rating,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl Product {
    pub fn brand_or_na(&self) -> &str {
        self.brand.as_deref().unwrap_or("N/A")
    }
}

/// Source of categories and products
pub trait CatalogStore: Send + Sync {
    /// Category ids in display order
    fn categories(&self) -> &[String];

    /// All products in display order
    fn products(&self) -> &[Product];

    /// Case-insensitive exact lookup of a category id
    fn find_category(&self, id: &str) -> Option<&str> {
        self.categories()
            .iter()
            .find(|c| c.eq_ignore_ascii_case(id))
            .map(String::as_str)
    }

    fn products_in(&self, category: &str) -> Vec<Product> {
        self.products()
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    /// Substring match on title or brand. `keyword` must already be lowercase.
    fn search(&self, keyword: &str) -> Vec<Product> {
        self.products()
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(keyword)
                    || p
                        .brand
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(keyword))
            })
            .cloned()
            .collect()
    }
}

/// Catalog backed by a `products.json` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonCatalog {
    pub categories: Vec<String>,
    pub products: Vec<Product>,
}

impl JsonCatalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl CatalogStore for JsonCatalog {
    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Human-readable category name: `womens-dresses` -> `Women's Dresses`
pub fn display_category(id: &str) -> String {
    let spaced = id
        .replace('-', " ")
        .replace("womens", "women's")
        .replace("mens", "men's");
    title_case(&spaced)
}

/// Uppercase the first letter of every word, lowercase the rest.
/// An apostrophe does not start a new word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = in_word && c == '\'';
        }
    }
    out
}
