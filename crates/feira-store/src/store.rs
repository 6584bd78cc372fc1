//! # Entity Store Contract
//!
//! The persistence seam of Feira POS: collection-scoped CRUD for every
//! entity, plus the sale-effect operations that each backend implements
//! atomically.
//!
//! ## Sale Lifecycle Through the Store
//! ```text
//! 1. COMMIT
//!    └── commit_sale(sale)
//!        ├── persist the sale record (snapshots already frozen)
//!        ├── per non-AVULSO line: product.stock -= quantity  (no floor)
//!        └── if customer set and crates moved:
//!            customer.crates_balance += crates_out − crates_in
//!
//! 2. (OPTIONAL) SETTLE  - credit sales only ("baixar nota")
//!    └── mark_sale_paid(id): Pending → Paid; stock/crates untouched
//!
//! 3. (OPTIONAL) CANCEL
//!    └── cancel_sale(id)
//!        ├── already Cancelled? no-op (idempotent)
//!        ├── status := Cancelled
//!        ├── per non-AVULSO line: product.stock += quantity
//!        └── if customer set:
//!            customer.crates_balance -= crates_out − crates_in
//! ```
//!
//! Each of the three is all-or-nothing inside a single backend mutation
//! (one write-lock critical section in memory, one transaction in SQLite),
//! so a failure never leaves stock or crate figures out of sync with the
//! sale history.

use async_trait::async_trait;

use feira_core::{
    Customer, CustomerPayment, DamagedGood, Expense, Product, Sale, SystemSettings, User,
};

use crate::error::StoreResult;

/// Collection-scoped persistence contract.
///
/// Implementations: [`crate::MemoryStore`] (in-memory / JSON snapshot) and
/// `SqliteStore` in feira-db. The application layer holds this as
/// `Arc<dyn EntityStore>` and never assumes a backend.
///
/// `save_*` methods upsert by id; callers assign UUIDs before saving.
/// The two insert-with-effects operations (`commit_sale`,
/// `save_damaged_good`) assign an id themselves when the given one is
/// blank, and return the stored value.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // -------------------------------------------------------------------------
    // Settings (singleton)
    // -------------------------------------------------------------------------

    /// Returns the singleton settings row, falling back to defaults when
    /// none has been saved yet.
    async fn settings(&self) -> StoreResult<SystemSettings>;

    async fn save_settings(&self, settings: &SystemSettings) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    async fn users(&self) -> StoreResult<Vec<User>>;

    async fn save_user(&self, user: &User) -> StoreResult<()>;

    async fn delete_user(&self, id: &str) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn products(&self) -> StoreResult<Vec<Product>>;

    async fn product(&self, id: &str) -> StoreResult<Option<Product>>;

    async fn save_product(&self, product: &Product) -> StoreResult<()>;

    async fn delete_product(&self, id: &str) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn customers(&self) -> StoreResult<Vec<Customer>>;

    async fn customer(&self, id: &str) -> StoreResult<Option<Customer>>;

    async fn save_customer(&self, customer: &Customer) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Sales (lifecycle operations - atomic per call)
    // -------------------------------------------------------------------------

    async fn sales(&self) -> StoreResult<Vec<Sale>>;

    async fn sale(&self, id: &str) -> StoreResult<Option<Sale>>;

    /// Persists a new sale and applies its derived effects atomically:
    /// stock decrements for inventory lines and the customer crate-balance
    /// delta. Assigns a UUID when `sale.id` is blank. Returns the stored
    /// sale.
    ///
    /// Stock is NOT floored here - committing more than is on hand drives
    /// the count negative.
    async fn commit_sale(&self, sale: Sale) -> StoreResult<Sale>;

    /// Cancels a sale, reversing its commit effects exactly.
    ///
    /// ## Contract
    /// - Unknown id → `NotFound`
    /// - Already Cancelled → Ok, nothing changes (idempotent)
    /// - Otherwise: status := Cancelled, stock restored per inventory
    ///   line, crate delta reversed when a customer is attached
    ///
    /// Cancelling does not restore revenue anywhere else - there is no
    /// cash-drawer ledger to compensate.
    async fn cancel_sale(&self, id: &str) -> StoreResult<()>;

    /// Settles a pending credit sale ("baixar nota").
    ///
    /// ## Contract
    /// - Unknown id → `NotFound`
    /// - Pending → Paid
    /// - Already Paid → Ok, nothing changes (idempotent)
    /// - Cancelled → `InvalidStatus` (terminal)
    ///
    /// Stock and crates were applied at commit time and are untouched.
    /// No `CustomerPayment` record is created.
    async fn mark_sale_paid(&self, id: &str) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Customer payments (aggregate-debt abatements)
    // -------------------------------------------------------------------------

    async fn customer_payments(&self) -> StoreResult<Vec<CustomerPayment>>;

    async fn save_customer_payment(&self, payment: &CustomerPayment) -> StoreResult<()>;

    async fn delete_customer_payment(&self, id: &str) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Damaged goods
    // -------------------------------------------------------------------------

    async fn damaged_goods(&self) -> StoreResult<Vec<DamagedGood>>;

    /// Records a damaged-goods write-off and decrements the product's
    /// stock, floored at zero, in the same atomic mutation. Assigns a
    /// UUID when the id is blank. One-way: there is no undo.
    async fn save_damaged_good(&self, damaged: DamagedGood) -> StoreResult<DamagedGood>;

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    async fn expenses(&self) -> StoreResult<Vec<Expense>>;

    async fn save_expense(&self, expense: &Expense) -> StoreResult<()>;

    async fn delete_expense(&self, id: &str) -> StoreResult<()>;
}
