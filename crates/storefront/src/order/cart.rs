//! Cart lines with key-based deduplication.

use boba_lab_core::{LineKey, ProductId, Rupiah};
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, SelectedOptions};

/// One distinct product + option configuration with an aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Rupiah,
    pub options: SelectedOptions,
    pub quantity: u32,
    pub key: LineKey,
}

impl CartLine {
    /// Build a line for `product` with already-normalized options.
    #[must_use]
    pub fn new(product: &Product, options: SelectedOptions, quantity: u32) -> Self {
        let key = LineKey::derive(
            &product.id,
            &[&options.ice, &options.sweetness, &options.topping],
        );
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            options,
            quantity,
            key,
        }
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Rupiah {
        self.unit_price.times(self.quantity)
    }
}

/// Ordered list of cart lines. At most one line per [`LineKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Merge `line` into the cart. Returns the key of the affected line.
    ///
    /// Lines with a zero quantity are ignored.
    pub fn add(&mut self, line: CartLine) -> Option<LineKey> {
        if line.quantity == 0 {
            return None;
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.key == line.key) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            return Some(existing.key.clone());
        }

        let key = line.key.clone();
        self.lines.push(line);
        Some(key)
    }

    /// Adjust the quantity of a line by `delta`, removing it at zero or below.
    ///
    /// Returns the new quantity, `Some(0)` if the line was removed, or `None`
    /// if no line has that key.
    pub fn change_quantity(&mut self, key: &LineKey, delta: i32) -> Option<u32> {
        let index = self.lines.iter().position(|l| &l.key == key)?;
        let line = self.lines.get_mut(index)?;

        let next = i64::from(line.quantity) + i64::from(delta);
        if next <= 0 {
            self.lines.remove(index);
            return Some(0);
        }

        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(line.quantity)
    }

    /// Remove a line. Returns the removed line, if any.
    pub fn remove(&mut self, key: &LineKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| &l.key == key)?;
        Some(self.lines.remove(index))
    }

    /// Look up a line by key.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key == key)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, l| sum.saturating_add(l.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Rupiah {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Remove every line, returning them.
    pub fn take_all(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}
