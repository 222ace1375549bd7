//! Products that can be dragged onto shelves.

use std::io;
use std::path::{Path, PathBuf};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Item;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub barcode: String,
    #[serde(rename = "productName")]
    pub name: String,
    #[serde(rename = "productCategory", default)]
    pub category: String,
    #[serde(rename = "productBrand", default)]
    pub brand: String,
    #[serde(rename = "productPrice", default)]
    pub price: f64,
    #[serde(rename = "productWeight", default)]
    pub weight: f64,
    #[serde(rename = "productQuantity", default)]
    pub quantity: u32,
}

impl Product {
    /// The item a drag from the catalog carries. It has no cell yet.
    pub fn to_item(&self) -> Item {
        Item::new(self.barcode.clone(), self.name.clone())
    }

    fn search_text(&self) -> String {
        format!("{} {} {} {}", self.name, self.brand, self.category, self.barcode)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_json(s: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(s)?))
    }

    /// A missing file gives an empty catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        match std::fs::read_to_string(path) {
            Ok(s) => {
                let catalog = Self::from_json(&s)?;
                log::info!("Loaded {} products from {}", catalog.len(), path.display());
                Ok(catalog)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No catalog at {}, inventory list is empty", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, barcode: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.barcode == barcode)
    }

    /// Best matches first; an empty query keeps catalog order.
    pub fn filter(&self, query: &str) -> Vec<&Product> {
        let q = query.trim();
        if q.is_empty() {
            return self.products.iter().collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(&Product, i64)> = self
            .products
            .iter()
            .filter_map(|p| matcher.fuzzy_match(&p.search_text(), q).map(|s| (p, s)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name.cmp(&b.0.name)));
        scored.into_iter().map(|(p, _)| p).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"barcode": "P001-A1B2C3D4", "productName": "Organic Coffee Beans",
         "productCategory": "Beverages", "productBrand": "Bean Bliss",
         "productPrice": 12.99, "productWeight": 0.5, "productQuantity": 150,
         "productDescription": "ignored"},
        {"barcode": "P002-E5F6G7H8", "productName": "Smart LED TV",
         "productCategory": "Electronics", "productBrand": "ElectroVision"},
        {"barcode": "P005-Q7R8S9T0", "productName": "Steel Water Bottle"}
    ]"#;

    #[test]
    fn parses_product_documents() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        let coffee = catalog.find("P001-A1B2C3D4").unwrap();
        assert_eq!(coffee.brand, "Bean Bliss");
        assert_eq!(coffee.quantity, 150);
        assert_eq!(catalog.find("P005-Q7R8S9T0").unwrap().price, 0.0);
    }

    #[test]
    fn product_becomes_unplaced_item() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let item = catalog.find("P002-E5F6G7H8").unwrap().to_item();
        assert_eq!(item, Item::new("P002-E5F6G7H8", "Smart LED TV"));
    }

    #[test]
    fn filter_matches_name_brand_and_category() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.filter("").len(), 3);
        let hits: Vec<_> = catalog.filter("coffee").iter().map(|p| p.barcode.as_str()).collect();
        assert_eq!(hits, vec!["P001-A1B2C3D4"]);
        assert_eq!(catalog.filter("electro")[0].barcode, "P002-E5F6G7H8");
        assert!(catalog.filter("zzzzqqq").is_empty());
    }

    #[test]
    fn missing_file_is_an_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(&dir.path().join("products.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn broken_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, "[{").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Json(_))));
    }
}
