//! # Checkout
//!
//! Turns a built cart into a committed sale.
//!
//! ## Checkout Flow
//! ```text
//! Cart (feira-core)          Checkout (THIS MODULE)        Store
//! ─────────────────          ──────────────────────        ─────
//! lines, discounts  ───────► 1. reject empty cart
//!                            2. reject CREDIT without
//!                               a customer
//!                            3. build Sale: snapshots
//!                               frozen NOW, status from
//!                               payment method
//!                            4. commit_sale ────────────►  atomic effects:
//!                                                          stock −, crates ±
//! ```
//! Steps 1-3 run before anything is persisted: a rejected checkout leaves
//! stock and crate balances untouched.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use feira_core::validation::validate_crate_count;
use feira_core::{
    Cart, CoreError, Customer, PaymentMethod, Sale, SaleStatus, User, WALK_IN_CUSTOMER_NAME,
};
use feira_store::EntityStore;

use crate::error::PosResult;
use crate::service::Pos;

/// Everything the cashier chose at the checkout screen.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutRequest<'a> {
    pub cart: &'a Cart,
    pub payment_method: PaymentMethod,
    /// Required for credit sales; None = walk-in.
    pub customer: Option<&'a Customer>,
    pub seller: &'a User,
    /// Crate units the customer returned with this sale.
    pub crates_in: i64,
    /// Crate units the customer takes with this sale.
    pub crates_out: i64,
    /// Settlement deadline; recorded only for credit sales.
    pub due_date: Option<DateTime<Utc>>,
}

impl Pos {
    /// Commits the cart as a sale.
    ///
    /// Cash/Pix/Card sales are created directly as Paid; credit sales
    /// start Pending. Customer, seller and product data are snapshotted
    /// into the sale at this instant and never retroactively updated.
    pub async fn checkout(&self, request: CheckoutRequest<'_>) -> PosResult<Sale> {
        if request.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        if request.payment_method == PaymentMethod::Credit && request.customer.is_none() {
            return Err(CoreError::CustomerRequired.into());
        }
        validate_crate_count(request.crates_in)?;
        validate_crate_count(request.crates_out)?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            customer_id: request.customer.map(|c| c.id.clone()),
            customer_name: request
                .customer
                .map(|c| c.name.clone())
                .unwrap_or_else(|| WALK_IN_CUSTOMER_NAME.to_string()),
            seller_id: request.seller.id.clone(),
            seller_name: request.seller.name.clone(),
            items: request.cart.lines().to_vec(),
            total_amount_cents: request.cart.grand_total_cents(),
            global_discount_cents: request.cart.global_discount_cents(),
            global_surcharge_cents: request.cart.global_surcharge_cents(),
            payment_method: request.payment_method,
            due_date: if request.payment_method == PaymentMethod::Credit {
                request.due_date
            } else {
                None
            },
            status: request.payment_method.initial_status(),
            crates_in: request.crates_in,
            crates_out: request.crates_out,
        };

        info!(
            id = %sale.id,
            total = sale.total_amount_cents,
            method = sale.payment_method.as_str(),
            items = sale.items.len(),
            "Sale committed"
        );

        Ok(self.store().commit_sale(sale).await?)
    }

    /// Cancels a sale, reversing its stock and crate effects.
    ///
    /// Idempotent: cancelling an already-cancelled sale is a successful
    /// no-op. There is no revenue compensation beyond the reversal.
    pub async fn cancel_sale(&self, id: &str) -> PosResult<()> {
        Ok(self.store().cancel_sale(id).await?)
    }

    /// All sales, oldest first.
    pub async fn sales(&self) -> PosResult<Vec<Sale>> {
        Ok(self.store().sales().await?)
    }

    /// A single sale by id.
    pub async fn sale(&self, id: &str) -> PosResult<Option<Sale>> {
        Ok(self.store().sale(id).await?)
    }

    /// The POS sidebar view: newest non-cancelled sales first.
    pub async fn recent_sales(&self, limit: usize) -> PosResult<Vec<Sale>> {
        let mut sales: Vec<Sale> = self
            .store()
            .sales()
            .await?
            .into_iter()
            .filter(|s| s.status != SaleStatus::Cancelled)
            .collect();
        sales.sort_by(|a, b| b.date.cmp(&a.date));
        sales.truncate(limit);
        Ok(sales)
    }
}
