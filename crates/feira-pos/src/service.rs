//! # Pos Service
//!
//! The application façade: back-office CRUD with validation applied
//! before any store call. The sale lifecycle, credit, crate and session
//! operations live in their own modules as further `impl Pos` blocks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use feira_core::validation::{
    validate_customer_name, validate_description, validate_price_cents, validate_product_name,
    validate_quantity,
};
use feira_core::{
    CoreError, Customer, DamagedGood, Expense, ExpenseCategory, Product, SystemSettings,
};
use feira_store::EntityStore;

use crate::error::PosResult;

/// The Feira POS application service.
///
/// Holds the persistence backend as a trait object; all operations are
/// expressed against the store contract and never assume which backend
/// is wired in.
#[derive(Clone)]
pub struct Pos {
    store: Arc<dyn EntityStore>,
}

impl Pos {
    /// Creates the service over any store backend.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Pos { store }
    }

    /// The underlying store, for read paths the service doesn't wrap.
    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub async fn settings(&self) -> PosResult<SystemSettings> {
        Ok(self.store.settings().await?)
    }

    pub async fn save_settings(&self, settings: &SystemSettings) -> PosResult<()> {
        Ok(self.store.save_settings(settings).await?)
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub async fn products(&self) -> PosResult<Vec<Product>> {
        Ok(self.store.products().await?)
    }

    /// Creates a product, assigning its id and timestamps.
    pub async fn create_product(
        &self,
        name: &str,
        price_cents: i64,
        cost_price_cents: i64,
        stock: i64,
        category: &str,
        image_url: Option<String>,
    ) -> PosResult<Product> {
        validate_product_name(name)?;
        validate_price_cents(price_cents)?;
        validate_price_cents(cost_price_cents)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            price_cents,
            cost_price_cents,
            stock,
            category: category.trim().to_string(),
            image_url,
            created_at: now,
            updated_at: now,
        };

        info!(id = %product.id, name = %product.name, "Product created");
        self.store.save_product(&product).await?;
        Ok(product)
    }

    /// Saves edits to an existing product.
    pub async fn update_product(&self, mut product: Product) -> PosResult<Product> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        validate_price_cents(product.cost_price_cents)?;

        product.updated_at = Utc::now();
        self.store.save_product(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> PosResult<()> {
        Ok(self.store.delete_product(id).await?)
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    pub async fn customers(&self) -> PosResult<Vec<Customer>> {
        Ok(self.store.customers().await?)
    }

    /// Creates a customer with a zero crate balance.
    pub async fn create_customer(
        &self,
        name: &str,
        phone: &str,
        email: Option<String>,
        address: Option<String>,
    ) -> PosResult<Customer> {
        validate_customer_name(name)?;

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email,
            address,
            crates_balance: 0,
        };

        info!(id = %customer.id, name = %customer.name, "Customer created");
        self.store.save_customer(&customer).await?;
        Ok(customer)
    }

    /// Saves edits to an existing customer (including manual crate-balance
    /// corrections).
    pub async fn update_customer(&self, customer: Customer) -> PosResult<Customer> {
        validate_customer_name(&customer.name)?;
        self.store.save_customer(&customer).await?;
        Ok(customer)
    }

    // -------------------------------------------------------------------------
    // Damaged goods
    // -------------------------------------------------------------------------

    pub async fn damaged_goods(&self) -> PosResult<Vec<DamagedGood>> {
        Ok(self.store.damaged_goods().await?)
    }

    /// Records a damaged-goods write-off against a product.
    ///
    /// Snapshots the product name, then lets the store decrement stock
    /// (floored at zero) atomically with the insert. One-way: no undo.
    pub async fn record_damaged_good(
        &self,
        product_id: &str,
        quantity: i64,
        reason: &str,
    ) -> PosResult<DamagedGood> {
        validate_quantity(quantity)?;
        validate_description(reason)?;

        let product = self
            .store
            .product(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let damaged = DamagedGood {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            reason: reason.trim().to_string(),
        };

        info!(product = %product.name, quantity, "Damaged goods recorded");
        Ok(self.store.save_damaged_good(damaged).await?)
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    pub async fn expenses(&self) -> PosResult<Vec<Expense>> {
        Ok(self.store.expenses().await?)
    }

    pub async fn create_expense(
        &self,
        date: DateTime<Utc>,
        description: &str,
        amount_cents: i64,
        category: ExpenseCategory,
    ) -> PosResult<Expense> {
        validate_description(description)?;
        validate_price_cents(amount_cents)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            date,
            description: description.trim().to_string(),
            amount_cents,
            category,
        };

        self.store.save_expense(&expense).await?;
        Ok(expense)
    }

    pub async fn update_expense(&self, expense: Expense) -> PosResult<Expense> {
        validate_description(&expense.description)?;
        validate_price_cents(expense.amount_cents)?;

        self.store.save_expense(&expense).await?;
        Ok(expense)
    }

    pub async fn delete_expense(&self, id: &str) -> PosResult<()> {
        Ok(self.store.delete_expense(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
