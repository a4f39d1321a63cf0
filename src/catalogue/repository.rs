use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::{
    assets::store::{AssetKey, AssetStore},
    catalogue::model::{ProductRenderSpec, ProductRepository},
    foundation::error::{CardError, CardResult},
};

/// In-memory product repository keyed by id.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalogue {
    products: HashMap<String, ProductRenderSpec>,
}

impl MemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: impl IntoIterator<Item = ProductRenderSpec>) -> Self {
        let mut out = Self::new();
        for p in products {
            out.insert(p);
        }
        out
    }

    pub fn insert(&mut self, product: ProductRenderSpec) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn remove(&mut self, id: &str) -> Option<ProductRenderSpec> {
        self.products.remove(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductRepository for MemoryCatalogue {
    fn get_by_id(&self, id: &str) -> Option<ProductRenderSpec> {
        self.products.get(id).cloned()
    }
}

/// Product repository loaded from a JSON array of [`ProductRenderSpec`] records.
#[derive(Clone, Debug, Default)]
pub struct JsonCatalogue {
    inner: MemoryCatalogue,
}

impl JsonCatalogue {
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        let products: Vec<ProductRenderSpec> = serde_json::from_str(s)
            .map_err(|e| CardError::validation(format!("invalid catalogue json: {e}")))?;
        Ok(Self {
            inner: MemoryCatalogue::from_products(products),
        })
    }

    pub fn from_path(path: &Path) -> CardResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read catalogue '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ProductRepository for JsonCatalogue {
    fn get_by_id(&self, id: &str) -> Option<ProductRenderSpec> {
        self.inner.get_by_id(id)
    }
}

/// Delete every rendered card of `product_id` across `folder_labels`.
///
/// Called when a catalogue item is removed. Returns how many keys were processed.
pub fn remove_product_assets<S: AssetStore + ?Sized>(
    store: &S,
    product_id: &str,
    folder_labels: &[&str],
) -> CardResult<usize> {
    let mut n = 0;
    for label in folder_labels {
        let key = AssetKey::new(product_id, *label)?;
        store.delete(&key)?;
        tracing::debug!(path = %key.rel_path(), "deleted card");
        n += 1;
    }
    Ok(n)
}
