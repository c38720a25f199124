//! The cart: a read-only view of the catalog's non-zero quantities.
//!
//! There is no separate cart quantity to keep in step. A line exists exactly
//! when its product's quantity is above zero, and carries that quantity.

use crate::catalog::Catalog;
use crate::types::{Product, ProductId, truncate_chars};
use serde::Serialize;

/// One product in the cart with its selected quantity
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Product this line refers to
    pub id: ProductId,
    /// Product name at projection time
    pub name: String,
    /// Product image at projection time
    pub image_url: String,
    /// Selected quantity, always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Display name cut to at most `max_chars` characters
    #[must_use]
    pub fn short_name(&self, max_chars: usize) -> &str {
        truncate_chars(&self.name, max_chars)
    }

    fn from_product(product: &Product) -> Option<Self> {
        product.in_cart().then(|| Self {
            id: product.id,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            quantity: product.quantity,
        })
    }
}

/// Cart lines in catalog order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Projects the cart from a catalog
    #[must_use]
    pub fn project(catalog: &Catalog) -> Self {
        Self {
            lines: catalog.products().filter_map(CartLine::from_product).collect(),
        }
    }

    /// All lines in catalog order
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the line for `id`, if the product is in the cart
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        // Lines follow catalog order, which is ordered by id
        self.lines
            .binary_search_by_key(&id, |line| line.id)
            .ok()
            .map(|index| &self.lines[index])
    }

    /// Checks if a product is in the cart
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    /// Returns the number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no product is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
