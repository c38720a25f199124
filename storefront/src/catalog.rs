//! The catalog: every loaded product and its selected quantity.
//!
//! This is the single place quantities are stored. The cart is derived from
//! it (see [`crate::cart`]).

use crate::cart::Cart;
use crate::types::{Product, ProductId, QuantityUpdate, RawProduct};
use std::collections::BTreeMap;

/// Products keyed by [`ProductId`], iterated in load order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    /// Creates an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog loaded from `items`
    #[must_use]
    pub fn from_raw<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RawProduct>,
    {
        let mut catalog = Self::new();
        catalog.load(items);
        catalog
    }

    /// Replaces the contents with `items`
    ///
    /// Each record becomes a product with quantity zero whose id is its
    /// 0-based position in `items`. Returns the number of products loaded.
    pub fn load<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = RawProduct>,
    {
        self.products = items
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let id = ProductId::new(index);
                (id, Product::from_raw(id, raw))
            })
            .collect();
        self.products.len()
    }

    /// Removes every product
    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// Raises the quantity of `id` by one
    pub fn increment(&mut self, id: ProductId) -> QuantityUpdate {
        let Some(product) = self.products.get_mut(&id) else {
            return QuantityUpdate::UnknownId(id);
        };

        match product.quantity.checked_add(1) {
            Some(quantity) => {
                product.quantity = quantity;
                QuantityUpdate::Changed { id, quantity }
            }
            None => QuantityUpdate::AtCeiling(id),
        }
    }

    /// Lowers the quantity of `id` by one, never below zero
    pub fn decrement(&mut self, id: ProductId) -> QuantityUpdate {
        let Some(product) = self.products.get_mut(&id) else {
            return QuantityUpdate::UnknownId(id);
        };

        match product.quantity.checked_sub(1) {
            Some(quantity) => {
                product.quantity = quantity;
                QuantityUpdate::Changed { id, quantity }
            }
            None => QuantityUpdate::AtFloor(id),
        }
    }

    /// Returns a product by id
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Returns the selected quantity of a product
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(|product| product.quantity)
    }

    /// Checks if a product exists
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    /// Products in load order
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Returns the number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if nothing is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The cart implied by the current quantities
    #[must_use]
    pub fn cart(&self) -> Cart {
        Cart::project(self)
    }
}
