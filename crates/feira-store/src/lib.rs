//! # feira-store: Persistence Contract for Feira POS
//!
//! This crate owns the persistence seam: the [`EntityStore`] trait that
//! every backend implements, and the in-memory/JSON-snapshot backend.
//!
//! ## Architecture Position
//! ```text
//! feira-pos (application services)
//!      │
//!      ▼  Arc<dyn EntityStore>
//! ┌─────────────────────────────────────────────┐
//! │           feira-store (THIS CRATE)          │
//! │                                             │
//! │  ┌──────────────┐      ┌─────────────────┐  │
//! │  │ EntityStore  │◄─────│   MemoryStore   │  │
//! │  │   (trait)    │      │ RwLock + JSON   │  │
//! │  └──────┬───────┘      └─────────────────┘  │
//! └─────────┼───────────────────────────────────┘
//!           │
//!           ▼ implemented by
//!      feira-db::SqliteStore
//! ```
//!
//! The sale-effect operations (`commit_sale`, `cancel_sale`,
//! `mark_sale_paid`, `save_damaged_good`) are atomic per call in every
//! backend; see [`store`] for the full contract.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::EntityStore;
