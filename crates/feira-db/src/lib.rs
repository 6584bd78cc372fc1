//! # feira-db: SQLite Backend for Feira POS
//!
//! Implements the `EntityStore` contract from feira-store on SQLite.
//!
//! ## Architecture Position
//! ```text
//! feira-pos (application services)
//!      │ Arc<dyn EntityStore>
//!      ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                 feira-db (THIS CRATE)                  │
//! │                                                        │
//! │   ┌─────────────┐  ┌──────────────┐  ┌─────────────┐   │
//! │   │ SqliteStore │  │  store_impl  │  │ Migrations  │   │
//! │   │  (pool.rs)  │  │ (SQL + rows) │  │ (embedded)  │   │
//! │   │             │  │              │  │             │   │
//! │   │ SqlitePool  │◄─│ transactions │  │ 001_init.sql│   │
//! │   │ WAL, FK on  │  │ per lifecycle│  │ ...         │   │
//! │   └─────────────┘  └──────────────┘  └─────────────┘   │
//! └────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite database file (or :memory: in tests)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feira_db::{DbConfig, SqliteStore};
//!
//! let store = SqliteStore::new(DbConfig::new("data/feira.db")).await?;
//! let products = store.products().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
mod store_impl;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{DbConfig, SqliteStore};
