//! # Domain Types
//!
//! Core domain types used throughout Feira POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │    Product      │   │      Sale       │   │ CustomerPayment │
//! │  ─────────────  │   │  ─────────────  │   │  ─────────────  │
//! │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │
//! │  price_cents    │   │  status         │   │  customer_id    │
//! │  stock          │   │  items[]        │   │  amount_cents   │
//! └─────────────────┘   │  crates in/out  │   └─────────────────┘
//!                       └─────────────────┘
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │    Customer     │   │   SaleStatus    │   │ PaymentMethod   │
//! │  ─────────────  │   │  ─────────────  │   │  ─────────────  │
//! │  crates_balance │   │  Paid           │   │  Cash Pix Card  │
//! └─────────────────┘   │  Pending        │   │  Credit (fiado) │
//!                       │  Cancelled      │   └─────────────────┘
//!                       └─────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Names and unit prices are copied into `Sale`/`SaleItem`/`CustomerPayment`
//! at creation time and never updated afterwards, so receipts stay
//! historically accurate when the source entity is later edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::{AD_HOC_PRODUCT_ID, DEFAULT_APP_NAME, DEFAULT_SETTINGS_ID};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale (a fruit, a pulp batch, a box of produce).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the POS grid and on receipts.
    pub name: String,

    /// Unit sale price in centavos.
    pub price_cents: i64,

    /// Unit cost price in centavos (for margin reports).
    pub cost_price_cents: i64,

    /// On-hand stock count. Signed: sales may drive it negative,
    /// only damaged-goods write-offs floor it at zero.
    pub stock: i64,

    /// Free-form category ("fruta", "polpa", ...).
    pub category: String,

    /// Optional image reference for the POS grid.
    pub image_url: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether any stock is on hand.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A wholesale customer.
///
/// `crates_balance` tracks returnable produce crates: positive means the
/// customer owes crates to the business. No floor or ceiling is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub crates_balance: i64,
}

// =============================================================================
// User & Role
// =============================================================================

/// Access roles for back-office users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Financial,
    Seller,
}

impl UserRole {
    /// Stable string form used by store backends.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Financial => "FINANCIAL",
            UserRole::Seller => "SELLER",
        }
    }

    /// Parses the stable string form back into a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(UserRole::Admin),
            "FINANCIAL" => Some(UserRole::Financial),
            "SELLER" => Some(UserRole::Seller),
            _ => None,
        }
    }
}

/// A back-office user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Argon2 PHC hash string. None for accounts that cannot sign in yet.
    pub password_hash: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash ("dinheiro").
    Cash,
    /// Instant PIX transfer.
    Pix,
    /// Card on external terminal ("cartão").
    Card,
    /// Store credit ("fiado") - settled later.
    Credit,
}

impl PaymentMethod {
    /// Stable string form used by store backends.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Credit => "CREDIT",
        }
    }

    /// Parses the stable string form back into a method.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(PaymentMethod::Cash),
            "PIX" => Some(PaymentMethod::Pix),
            "CARD" => Some(PaymentMethod::Card),
            "CREDIT" => Some(PaymentMethod::Credit),
            _ => None,
        }
    }

    /// Receipt label - the names customers know.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "DINHEIRO",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Card => "CARTÃO",
            PaymentMethod::Credit => "FIADO",
        }
    }

    /// The status a freshly committed sale gets for this method.
    ///
    /// Cash/Pix/Card sales are created directly as Paid; only credit
    /// sales start Pending and are settled later ("baixar nota").
    pub const fn initial_status(&self) -> SaleStatus {
        match self {
            PaymentMethod::Credit => SaleStatus::Pending,
            _ => SaleStatus::Paid,
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
///
/// Transitions: Pending→Paid, Pending→Cancelled, Paid→Cancelled.
/// Cancelled is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Sale has been paid in full.
    Paid,
    /// Credit sale awaiting settlement.
    Pending,
    /// Sale was cancelled; stock and crate effects were reversed.
    Cancelled,
}

impl SaleStatus {
    /// Stable string form used by store backends.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Paid => "PAID",
            SaleStatus::Pending => "PENDING",
            SaleStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parses the stable string form back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PAID" => Some(SaleStatus::Paid),
            "PENDING" => Some(SaleStatus::Pending),
            "CANCELLED" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether no further transitions are allowed from this status.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, SaleStatus::Cancelled)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    /// Product id, or the `AVULSO` sentinel for an ad-hoc line with no
    /// inventory link.
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Per-line discount in centavos.
    pub discount_cents: i64,
    /// Per-line surcharge in centavos.
    pub surcharge_cents: i64,
    /// Line total: max(0, quantity × unit_price − discount + surcharge).
    pub total_cents: i64,
}

impl SaleItem {
    /// Creates a line for an inventory product, computing its total.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price_cents: i64,
        discount_cents: i64,
        surcharge_cents: i64,
    ) -> Self {
        let total_cents =
            Self::compute_total_cents(quantity, unit_price_cents, discount_cents, surcharge_cents);
        SaleItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price_cents,
            discount_cents,
            surcharge_cents,
            total_cents,
        }
    }

    /// Creates an ad-hoc ("avulso") line: free-text description, manual
    /// price, quantity fixed at 1, no inventory link.
    pub fn ad_hoc(description: &str, value_cents: i64) -> Self {
        SaleItem::new(
            AD_HOC_PRODUCT_ID,
            format!("[AVULSO] {}", description.to_uppercase()),
            1,
            value_cents,
            0,
            0,
        )
    }

    /// Line total formula: max(0, qty × price − discount + surcharge).
    #[inline]
    pub fn compute_total_cents(
        quantity: i64,
        unit_price_cents: i64,
        discount_cents: i64,
        surcharge_cents: i64,
    ) -> i64 {
        (Money::from_cents(unit_price_cents).multiply_quantity(quantity)
            - Money::from_cents(discount_cents)
            + Money::from_cents(surcharge_cents))
        .clamp_non_negative()
        .cents()
    }

    /// Recomputes `total_cents` from the current field values.
    pub fn recompute_total(&mut self) {
        self.total_cents = Self::compute_total_cents(
            self.quantity,
            self.unit_price_cents,
            self.discount_cents,
            self.surcharge_cents,
        );
    }

    /// Whether this is an ad-hoc line exempt from all stock mutation.
    #[inline]
    pub fn is_ad_hoc(&self) -> bool {
        self.product_id == AD_HOC_PRODUCT_ID
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub date: DateTime<Utc>,
    /// None for a walk-in sale.
    pub customer_id: Option<String>,
    /// Customer name at time of sale (frozen).
    pub customer_name: String,
    pub seller_id: String,
    /// Seller name at time of sale (frozen).
    pub seller_name: String,
    /// Ordered line items.
    pub items: Vec<SaleItem>,
    /// max(0, Σ item totals − global_discount + global_surcharge).
    pub total_amount_cents: i64,
    pub global_discount_cents: i64,
    pub global_surcharge_cents: i64,
    pub payment_method: PaymentMethod,
    /// Meaningful only for credit sales.
    pub due_date: Option<DateTime<Utc>>,
    pub status: SaleStatus,
    /// Crate units the customer returned in this transaction.
    pub crates_in: i64,
    /// Crate units the customer borrowed in this transaction.
    pub crates_out: i64,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Net crate movement: positive when the customer ends up owing more
    /// crates after this sale.
    #[inline]
    pub fn crate_delta(&self) -> i64 {
        self.crates_out - self.crates_in
    }

    /// Whether this sale moves any crates at all.
    #[inline]
    pub fn has_crate_movement(&self) -> bool {
        self.crates_out > 0 || self.crates_in > 0
    }

    /// Whether this is a credit ("fiado") sale.
    #[inline]
    pub fn is_credit(&self) -> bool {
        self.payment_method == PaymentMethod::Credit
    }
}

// =============================================================================
// Customer Payment
// =============================================================================

/// A standalone abatement against a customer's aggregate credit debt.
///
/// Deliberately NOT linked to any specific sale: the customer pays down
/// the tab as a whole, and net pending debt is recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPayment {
    pub id: String,
    pub date: DateTime<Utc>,
    pub customer_id: String,
    /// Customer name at time of payment (frozen).
    pub customer_name: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

impl CustomerPayment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Damaged Good
// =============================================================================

/// A damaged/spoiled stock write-off. One-way: there is no undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagedGood {
    pub id: String,
    pub date: DateTime<Utc>,
    pub product_id: String,
    /// Product name at time of write-off (frozen).
    pub product_name: String,
    pub quantity: i64,
    pub reason: String,
}

// =============================================================================
// Expense
// =============================================================================

/// Expense bookkeeping categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Wages and day labor ("funcionário").
    Employee,
    /// Freight in/out ("frete").
    Freight,
    /// Loading/unloading crews ("carga/descarga").
    Loading,
    Other,
}

impl ExpenseCategory {
    /// Stable string form used by store backends.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Employee => "EMPLOYEE",
            ExpenseCategory::Freight => "FREIGHT",
            ExpenseCategory::Loading => "LOADING",
            ExpenseCategory::Other => "OTHER",
        }
    }

    /// Parses the stable string form back into a category.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMPLOYEE" => Some(ExpenseCategory::Employee),
            "FREIGHT" => Some(ExpenseCategory::Freight),
            "LOADING" => Some(ExpenseCategory::Loading),
            "OTHER" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }
}

/// An operating expense. Not related to any other entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount_cents: i64,
    pub category: ExpenseCategory,
}

impl Expense {
    /// Returns the expense amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// System Settings
// =============================================================================

/// Singleton application settings (fixed id "default").
///
/// `total_crates` is the company-wide owned crate count. It is edited only
/// through a settings save, never by sale logic; the "crates in stock"
/// figure is derived from it on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    pub id: String,
    pub app_name: String,
    pub maintenance_mode: bool,
    pub total_crates: i64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        SystemSettings {
            id: DEFAULT_SETTINGS_ID.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            maintenance_mode: false,
            total_crates: 0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_formula() {
        // 4 × R$ 5,00 − R$ 2,00 + R$ 0,50 = R$ 18,50
        assert_eq!(SaleItem::compute_total_cents(4, 500, 200, 50), 1850);
        // Discount larger than the line floors at zero
        assert_eq!(SaleItem::compute_total_cents(1, 500, 800, 0), 0);
    }

    #[test]
    fn test_ad_hoc_item() {
        let item = SaleItem::ad_hoc("caixa mista", 1500);
        assert!(item.is_ad_hoc());
        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_cents, 1500);
        assert_eq!(item.product_name, "[AVULSO] CAIXA MISTA");
    }

    #[test]
    fn test_initial_status_by_method() {
        assert_eq!(PaymentMethod::Cash.initial_status(), SaleStatus::Paid);
        assert_eq!(PaymentMethod::Pix.initial_status(), SaleStatus::Paid);
        assert_eq!(PaymentMethod::Card.initial_status(), SaleStatus::Paid);
        assert_eq!(PaymentMethod::Credit.initial_status(), SaleStatus::Pending);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [SaleStatus::Paid, SaleStatus::Pending, SaleStatus::Cancelled] {
            assert_eq!(SaleStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SaleStatus::parse("VOIDED"), None);
        assert!(SaleStatus::Cancelled.is_terminal());
        assert!(!SaleStatus::Pending.is_terminal());
    }

    #[test]
    fn test_crate_delta() {
        let sale = Sale {
            id: "s1".to_string(),
            date: Utc::now(),
            customer_id: Some("c1".to_string()),
            customer_name: "Mercado Central".to_string(),
            seller_id: "u1".to_string(),
            seller_name: "Vendedor".to_string(),
            items: vec![],
            total_amount_cents: 0,
            global_discount_cents: 0,
            global_surcharge_cents: 0,
            payment_method: PaymentMethod::Cash,
            due_date: None,
            status: SaleStatus::Paid,
            crates_in: 2,
            crates_out: 5,
        };
        assert_eq!(sale.crate_delta(), 3);
        assert!(sale.has_crate_movement());
    }
}
