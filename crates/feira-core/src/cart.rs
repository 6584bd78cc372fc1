//! # Cart (Sale Builder)
//!
//! Accumulates line items into a pending sale and computes totals.
//!
//! ## Cart Operations Flow
//! ```text
//! Cashier Action            Operation             Cart Change
//! ──────────────            ─────────             ───────────
//! Tap product grid ───────► add_line() ─────────► merge or push line
//! Type description+price ─► add_ad_hoc_line() ──► push AVULSO line
//! Edit a line ────────────► update_line() ──────► recompute line total
//! Tap remove ─────────────► remove_line() ──────► drop line
//! Apply global discount ──► set_global_discount()
//! Checkout ───────────────► lines()/grand_total() consumed by feira-pos
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id`; adding the same product again
//!   increases quantity instead of pushing a duplicate line
//! - Each line total = max(0, qty × price − discount + surcharge)
//! - Grand total = max(0, subtotal − global_discount + global_surcharge)
//! - Ad-hoc ("avulso") lines keep quantity pinned at 1
//! - Maximum lines: 100; maximum quantity per line: 999

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleItem};
use crate::validation::{validate_description, validate_price_cents, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Field-level edit applied to a single cart line.
///
/// `None` fields are left untouched; the line total is recomputed after
/// the edit is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineUpdate {
    pub quantity: Option<i64>,
    pub unit_price_cents: Option<i64>,
    pub discount_cents: Option<i64>,
    pub surcharge_cents: Option<i64>,
}

/// The sale builder: an in-progress cart with a global discount/surcharge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<SaleItem>,
    global_discount_cents: i64,
    global_surcharge_cents: i64,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// Soft stock check: rejects only when the product has NO stock on
    /// hand. It does not reserve stock and does not block a quantity that
    /// exceeds the stock count.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if !product.in_stock() {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        // Merge with an existing line for the same product
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            line.recompute_total();
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(SaleItem::new(
            product.id.clone(),
            product.name.clone(),
            quantity,
            product.price_cents,
            0,
            0,
        ));
        Ok(())
    }

    /// Adds an ad-hoc ("avulso") line: free-text description, manual price,
    /// quantity fixed at 1, exempt from all stock logic downstream.
    pub fn add_ad_hoc_line(&mut self, description: &str, value_cents: i64) -> CoreResult<()> {
        validate_description(description)?;
        validate_price_cents(value_cents)?;

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(SaleItem::ad_hoc(description, value_cents));
        Ok(())
    }

    /// Applies a field-level edit to the line at `index` and recomputes
    /// its total.
    ///
    /// Quantity edits are ignored for ad-hoc lines (their quantity is
    /// pinned at 1).
    pub fn update_line(&mut self, index: usize, update: LineUpdate) -> CoreResult<()> {
        if let Some(qty) = update.quantity {
            validate_quantity(qty)?;
        }
        if let Some(price) = update.unit_price_cents {
            validate_price_cents(price)?;
        }
        if let Some(discount) = update.discount_cents {
            validate_price_cents(discount)?;
        }
        if let Some(surcharge) = update.surcharge_cents {
            validate_price_cents(surcharge)?;
        }

        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound { index })?;

        if let Some(qty) = update.quantity {
            if !line.is_ad_hoc() {
                line.quantity = qty;
            }
        }
        if let Some(price) = update.unit_price_cents {
            line.unit_price_cents = price;
        }
        if let Some(discount) = update.discount_cents {
            line.discount_cents = discount;
        }
        if let Some(surcharge) = update.surcharge_cents {
            line.surcharge_cents = surcharge;
        }
        line.recompute_total();
        Ok(())
    }

    /// Removes a line from the cart by product id.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::ProductNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Sets the sale-wide discount in centavos.
    pub fn set_global_discount_cents(&mut self, cents: i64) -> CoreResult<()> {
        validate_price_cents(cents)?;
        self.global_discount_cents = cents;
        Ok(())
    }

    /// Sets the sale-wide surcharge in centavos.
    pub fn set_global_surcharge_cents(&mut self, cents: i64) -> CoreResult<()> {
        validate_price_cents(cents)?;
        self.global_surcharge_cents = cents;
        Ok(())
    }

    /// Clears all lines and the global discount/surcharge.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.global_discount_cents = 0;
        self.global_surcharge_cents = 0;
    }

    /// The lines currently in the cart, in insertion order.
    pub fn lines(&self) -> &[SaleItem] {
        &self.lines
    }

    /// Number of lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sale-wide discount in centavos.
    pub fn global_discount_cents(&self) -> i64 {
        self.global_discount_cents
    }

    /// Sale-wide surcharge in centavos.
    pub fn global_surcharge_cents(&self) -> i64 {
        self.global_surcharge_cents
    }

    /// Subtotal: sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(SaleItem::total).sum()
    }

    /// Subtotal in centavos.
    pub fn subtotal_cents(&self) -> i64 {
        self.subtotal().cents()
    }

    /// Grand total: max(0, subtotal − global discount + global surcharge).
    pub fn grand_total(&self) -> Money {
        (self.subtotal() - Money::from_cents(self.global_discount_cents)
            + Money::from_cents(self.global_surcharge_cents))
        .clamp_non_negative()
    }

    /// Grand total in centavos.
    pub fn grand_total_cents(&self) -> i64 {
        self.grand_total().cents()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {}", id),
            price_cents,
            cost_price_cents: price_cents / 2,
            stock,
            category: "fruta".to_string(),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 10);

        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(), 1000);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 10);

        cart.add_line(&product, 2).unwrap();
        cart.add_line(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.subtotal_cents(), 2500);
    }

    #[test]
    fn test_add_line_rejects_out_of_stock() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 0);

        let err = cart.add_line(&product, 1).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_soft_check_allows_overselling_in_stock_product() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 3);

        // Quantity above stock is allowed as long as some stock exists
        cart.add_line(&product, 10).unwrap();
        assert_eq!(cart.total_quantity(), 10);
    }

    #[test]
    fn test_ad_hoc_line() {
        let mut cart = Cart::new();
        cart.add_ad_hoc_line("meia caixa de manga", 2500).unwrap();

        let line = &cart.lines()[0];
        assert!(line.is_ad_hoc());
        assert_eq!(line.quantity, 1);
        assert_eq!(cart.subtotal_cents(), 2500);

        // Quantity edits do not move an ad-hoc line off 1
        cart.update_line(
            0,
            LineUpdate {
                quantity: Some(4),
                ..LineUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_update_line_recomputes_total() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 10);
        cart.add_line(&product, 4).unwrap();

        cart.update_line(
            0,
            LineUpdate {
                discount_cents: Some(200),
                surcharge_cents: Some(50),
                ..LineUpdate::default()
            },
        )
        .unwrap();

        // 4 × 500 − 200 + 50
        assert_eq!(cart.lines()[0].total_cents, 1850);
    }

    #[test]
    fn test_line_total_floors_at_zero() {
        let mut cart = Cart::new();
        let product = test_product("p1", 100, 10);
        cart.add_line(&product, 1).unwrap();

        cart.update_line(
            0,
            LineUpdate {
                discount_cents: Some(500),
                ..LineUpdate::default()
            },
        )
        .unwrap();

        assert_eq!(cart.lines()[0].total_cents, 0);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 10);
        cart.add_line(&product, 1).unwrap();

        cart.remove_line("p1").unwrap();
        assert!(cart.is_empty());

        let err = cart.remove_line("p1").unwrap_err();
        assert!(matches!(err, CoreError::ProductNotInCart(_)));
    }

    #[test]
    fn test_grand_total_with_global_adjustments() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 20);
        cart.add_line(&product, 4).unwrap();

        cart.set_global_discount_cents(200).unwrap();
        // 4 × 5,00 − 2,00 = 18,00
        assert_eq!(cart.grand_total_cents(), 1800);

        cart.set_global_surcharge_cents(100).unwrap();
        assert_eq!(cart.grand_total_cents(), 1900);
    }

    #[test]
    fn test_grand_total_floors_at_zero() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 20);
        cart.add_line(&product, 1).unwrap();

        cart.set_global_discount_cents(10_000).unwrap();
        assert_eq!(cart.grand_total_cents(), 0);
    }

    #[test]
    fn test_clear_resets_adjustments() {
        let mut cart = Cart::new();
        let product = test_product("p1", 500, 20);
        cart.add_line(&product, 1).unwrap();
        cart.set_global_discount_cents(100).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.global_discount_cents(), 0);
        assert_eq!(cart.grand_total_cents(), 0);
    }
}
