//! # feira-core: Pure Business Logic for Feira POS
//!
//! This crate is the **heart** of Feira POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Feira POS Architecture                     │
//! │                                                                 │
//! │  feira-pos (application services: checkout, credit, reports)   │
//! │                              │                                  │
//! │  ┌───────────────────────────▼─────────────────────────────┐   │
//! │  │              ★ feira-core (THIS CRATE) ★                │   │
//! │  │                                                         │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌──────────┐ ┌─────┐ │   │
//! │  │  │ types  │ │ money  │ │  cart  │ │validation│ │acces│ │   │
//! │  │  │Product │ │ Money  │ │ Cart   │ │  rules   │ │roles│ │   │
//! │  │  │ Sale   │ │centavos│ │ lines  │ │  checks  │ │tabs │ │   │
//! │  │  └────────┘ └────────┘ └────────┘ └──────────┘ └─────┘ │   │
//! │  │                                                         │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS     │   │
//! │  └───────────────────────────┬─────────────────────────────┘   │
//! │                              │                                  │
//! │  feira-store / feira-db (persistence backends)                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Sale builder (line items, discounts, totals)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`access`] - Role capability checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use feira_core::Money` instead of
// `use feira_core::money::Money`

pub use cart::{Cart, LineUpdate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sentinel product id marking an ad-hoc ("avulso") sale line.
///
/// Lines carrying this id have no inventory link and are exempt from all
/// stock mutation on commit and cancel.
pub const AD_HOC_PRODUCT_ID: &str = "AVULSO";

/// Customer name recorded on walk-in sales (no customer selected).
pub const WALK_IN_CUSTOMER_NAME: &str = "Cliente Balcão";

/// Fixed id of the singleton settings row.
pub const DEFAULT_SETTINGS_ID: &str = "default";

/// Display name used until the owner renames the app in settings.
pub const DEFAULT_APP_NAME: &str = "Feira POS";

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
