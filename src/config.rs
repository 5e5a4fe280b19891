//! Store configuration - The static seed a storefront is mounted with.
//!
//! The seed is the only configuration-like input: product copy, the variant
//! list, and the premium-shipping flag held by the root. It can come from
//! JSON or from [`StoreConfig::default`], which describes the green/blue
//! sock storefront.
//!
//! ```json
//! {
//!   "premium": true,
//!   "product": {
//!     "brand": "Vue Mastery",
//!     "name": "Socks",
//!     "variants": [
//!       {
//!         "id": 2234,
//!         "color": "green",
//!         "image": "./assets/images/vmSocks-green-onWhite.jpeg",
//!         "quantity": 10
//!       }
//!     ]
//!   }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::state::VariantCatalog;
use crate::types::Variant;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub details: Vec<String>,
    pub variants: Vec<Variant>,
}

impl Default for ProductSeed {
    fn default() -> Self {
        Self {
            brand: "Vue Mastery".to_string(),
            name: "Socks".to_string(),
            alt_text: "A pair of socks".to_string(),
            on_sale: false,
            details: vec![
                "80% cotton".to_string(),
                "20% polyester".to_string(),
                "Gender neutral".to_string(),
            ],
            variants: vec![
                Variant::new(2234, "green", "./assets/images/vmSocks-green-onWhite.jpeg", 10),
                Variant::new(2235, "blue", "./assets/images/vmSocks-blue-onWhite.jpeg", 0),
            ],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub product: ProductSeed,
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading store config");
        Self::from_json_str(&json)
    }

    /// Same checks the product node applies when it builds its catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        VariantCatalog::new(self.product.variants.clone())?;
        Ok(())
    }
}
