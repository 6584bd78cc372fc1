//! # In-Memory Store
//!
//! In-memory `EntityStore` backend with an optional JSON snapshot file.
//!
//! ## Thread Safety & Atomicity
//! ALL collections live behind a single `tokio::sync::RwLock`, so a
//! multi-collection mutation (commit a sale + decrement stock + move the
//! crate balance) is one critical section: readers never observe a sale
//! whose side effects are half-applied.
//!
//! ## Snapshot File
//! When opened with a path, the whole store is serialized to one JSON
//! document after every mutation and reloaded on open - the offline
//! single-stall deployment. Without a path the store is purely in-memory
//! (tests, throwaway sessions).

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use feira_core::{
    Customer, CustomerPayment, DamagedGood, Expense, Product, Sale, SaleStatus, SystemSettings,
    User,
};

use crate::error::{StoreError, StoreResult};
use crate::store::EntityStore;

// =============================================================================
// Collections
// =============================================================================

/// Every entity collection, serialized together as the snapshot document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    settings: SystemSettings,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    sales: Vec<Sale>,
    #[serde(default)]
    customer_payments: Vec<CustomerPayment>,
    #[serde(default)]
    damaged_goods: Vec<DamagedGood>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

/// Replaces the element with the same id, or appends.
fn upsert<T: Clone>(items: &mut Vec<T>, item: &T, id_of: fn(&T) -> &str) {
    let key = id_of(item).to_string();
    match items.iter().position(|existing| id_of(existing) == key) {
        Some(index) => items[index] = item.clone(),
        None => items.push(item.clone()),
    }
}

/// Drops the element with the given id, if present.
fn remove_by_id<T>(items: &mut Vec<T>, id: &str, id_of: fn(&T) -> &str) {
    items.retain(|item| id_of(item) != id);
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory `EntityStore` backend.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Creates an empty store with no snapshot file.
    pub fn new() -> Self {
        MemoryStore {
            inner: RwLock::new(Collections::default()),
            snapshot_path: None,
        }
    }

    /// Opens a store backed by a JSON snapshot file.
    ///
    /// Loads the snapshot when the file exists; starts from defaults
    /// otherwise. Every subsequent mutation rewrites the file.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(err) => return Err(StoreError::Io(err)),
        };

        info!(path = %path.display(), "Opened snapshot store");

        Ok(MemoryStore {
            inner: RwLock::new(collections),
            snapshot_path: Some(path),
        })
    }

    /// Rewrites the snapshot file, when one is configured.
    ///
    /// Called with the write lock held so the document always reflects a
    /// fully applied mutation.
    async fn persist(&self, data: &Collections) -> StoreResult<()> {
        if let Some(path) = &self.snapshot_path {
            let bytes = serde_json::to_vec_pretty(data)?;
            tokio::fs::write(path, bytes).await?;
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    async fn settings(&self) -> StoreResult<SystemSettings> {
        Ok(self.inner.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: &SystemSettings) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        data.settings = settings.clone();
        self.persist(&data).await
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    async fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        upsert(&mut data.users, user, |u| &u.id);
        self.persist(&data).await
    }

    async fn delete_user(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.users, id, |u| &u.id);
        self.persist(&data).await
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.inner.read().await.products.clone())
    }

    async fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self
            .inner
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn save_product(&self, product: &Product) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        upsert(&mut data.products, product, |p| &p.id);
        self.persist(&data).await
    }

    async fn delete_product(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.products, id, |p| &p.id);
        self.persist(&data).await
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.inner.read().await.customers.clone())
    }

    async fn customer(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self
            .inner
            .read()
            .await
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn save_customer(&self, customer: &Customer) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        upsert(&mut data.customers, customer, |c| &c.id);
        self.persist(&data).await
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn sales(&self) -> StoreResult<Vec<Sale>> {
        Ok(self.inner.read().await.sales.clone())
    }

    async fn sale(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self
            .inner
            .read()
            .await
            .sales
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn commit_sale(&self, mut sale: Sale) -> StoreResult<Sale> {
        let mut data = self.inner.write().await;

        if sale.id.is_empty() {
            sale.id = Uuid::new_v4().to_string();
        }

        debug!(id = %sale.id, total = sale.total_amount_cents, "Committing sale");

        // Stock decrements - inventory lines only, no floor
        for item in &sale.items {
            if item.is_ad_hoc() {
                continue;
            }
            if let Some(product) = data.products.iter_mut().find(|p| p.id == item.product_id) {
                product.stock -= item.quantity;
                product.updated_at = Utc::now();
            }
        }

        // Crate balance delta
        if let Some(customer_id) = sale.customer_id.clone() {
            if sale.has_crate_movement() {
                if let Some(customer) = data.customers.iter_mut().find(|c| c.id == customer_id) {
                    customer.crates_balance += sale.crate_delta();
                }
            }
        }

        data.sales.push(sale.clone());
        self.persist(&data).await?;
        Ok(sale)
    }

    async fn cancel_sale(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;

        let index = data
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Sale", id))?;

        if data.sales[index].status == SaleStatus::Cancelled {
            return Ok(());
        }

        data.sales[index].status = SaleStatus::Cancelled;
        let sale = data.sales[index].clone();

        debug!(id = %sale.id, "Cancelling sale");

        // Restore stock - inventory lines only
        for item in &sale.items {
            if item.is_ad_hoc() {
                continue;
            }
            if let Some(product) = data.products.iter_mut().find(|p| p.id == item.product_id) {
                product.stock += item.quantity;
                product.updated_at = Utc::now();
            }
        }

        // Reverse the crate delta
        if let Some(customer_id) = &sale.customer_id {
            if let Some(customer) = data.customers.iter_mut().find(|c| &c.id == customer_id) {
                customer.crates_balance -= sale.crate_delta();
            }
        }

        self.persist(&data).await
    }

    async fn mark_sale_paid(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;

        {
            let sale = data
                .sales
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| StoreError::not_found("Sale", id))?;

            match sale.status {
                SaleStatus::Paid => return Ok(()),
                SaleStatus::Cancelled => {
                    return Err(StoreError::InvalidStatus {
                        id: id.to_string(),
                        status: sale.status.as_str().to_string(),
                    })
                }
                SaleStatus::Pending => sale.status = SaleStatus::Paid,
            }
        }

        self.persist(&data).await
    }

    // -------------------------------------------------------------------------
    // Customer payments
    // -------------------------------------------------------------------------

    async fn customer_payments(&self) -> StoreResult<Vec<CustomerPayment>> {
        Ok(self.inner.read().await.customer_payments.clone())
    }

    async fn save_customer_payment(&self, payment: &CustomerPayment) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        upsert(&mut data.customer_payments, payment, |p| &p.id);
        self.persist(&data).await
    }

    async fn delete_customer_payment(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.customer_payments, id, |p| &p.id);
        self.persist(&data).await
    }

    // -------------------------------------------------------------------------
    // Damaged goods
    // -------------------------------------------------------------------------

    async fn damaged_goods(&self) -> StoreResult<Vec<DamagedGood>> {
        Ok(self.inner.read().await.damaged_goods.clone())
    }

    async fn save_damaged_good(&self, mut damaged: DamagedGood) -> StoreResult<DamagedGood> {
        let mut data = self.inner.write().await;

        if damaged.id.is_empty() {
            damaged.id = Uuid::new_v4().to_string();
        }

        // Write-off floors stock at zero, unlike sales
        if let Some(product) = data.products.iter_mut().find(|p| p.id == damaged.product_id) {
            product.stock = (product.stock - damaged.quantity).max(0);
            product.updated_at = Utc::now();
        }

        data.damaged_goods.push(damaged.clone());
        self.persist(&data).await?;
        Ok(damaged)
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    async fn expenses(&self) -> StoreResult<Vec<Expense>> {
        Ok(self.inner.read().await.expenses.clone())
    }

    async fn save_expense(&self, expense: &Expense) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        upsert(&mut data.expenses, expense, |e| &e.id);
        self.persist(&data).await
    }

    async fn delete_expense(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.expenses, id, |e| &e.id);
        self.persist(&data).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
