//! # feira-pos: Application Services for Feira POS
//!
//! The orchestration layer tying the pure core to a store backend.
//!
//! ## Architecture Position
//! ```text
//! UI shell / API surface (out of scope)
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   feira-pos (THIS CRATE)                     │
//! │                                                              │
//! │  ┌──────────┐ ┌────────┐ ┌────────────┐ ┌───────┐ ┌──────┐  │
//! │  │ checkout │ │ credit │ │crate_ledger│ │session│ │report│  │
//! │  │ commit & │ │ settle │ │  derived   │ │argon2 │ │ text │  │
//! │  │  cancel  │ │ + debt │ │   views    │ │sign-in│ │  +Σ  │  │
//! │  └──────────┘ └────────┘ └────────────┘ └───────┘ └──────┘  │
//! │                    Pos { Arc<dyn EntityStore> }              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!              feira-store::MemoryStore  or  feira-db::SqliteStore
//! ```
//!
//! ## Wiring
//! ```rust,ignore
//! use std::sync::Arc;
//! use feira_pos::{Pos, SqliteStore, DbConfig};
//!
//! let store = SqliteStore::new(DbConfig::new("data/feira.db")).await?;
//! let pos = Pos::new(Arc::new(store));
//!
//! let session = pos.sign_in("ademir", "senha-forte").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod crate_ledger;
pub mod credit;
pub mod error;
pub mod reports;
pub mod service;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutRequest;
pub use crate_ledger::{crates_in_stock, CrateOverview};
pub use credit::CreditSummary;
pub use error::{PosError, PosResult};
pub use reports::{format_daily_summary, format_receipt, summarize_sales, DailySummary, SalesSummary};
pub use service::Pos;
pub use session::Session;

// Backend re-exports so application wiring needs a single import
pub use feira_db::{DbConfig, SqliteStore};
pub use feira_store::{EntityStore, MemoryStore};
