//! # Crate Ledger
//!
//! Derived view over the returnable-crate balances.
//!
//! `total_crates` (company-owned crates) lives in settings and is edited
//! only there - sale logic never touches it. What the sales move is each
//! customer's `crates_balance`; the "in stock" figure is derived:
//!
//! ```text
//! in_stock = total_crates − Σ customer.crates_balance
//! ```
//!
//! Nothing stops balances from exceeding the owned total, so the derived
//! figure can go negative - the screen shows it, the owner fixes the
//! count.

use serde::Serialize;

use feira_core::validation::validate_crate_count;
use feira_core::{Customer, SystemSettings};
use feira_store::EntityStore;

use crate::error::PosResult;
use crate::service::Pos;

/// Crates currently at the stall: owned minus loaned out.
pub fn crates_in_stock(settings: &SystemSettings, customers: &[Customer]) -> i64 {
    settings.total_crates - customers.iter().map(|c| c.crates_balance).sum::<i64>()
}

/// The crate panel numbers.
#[derive(Debug, Clone, Serialize)]
pub struct CrateOverview {
    /// Company-owned crate count (from settings).
    pub total_owned: i64,
    /// Σ customer balances (crates out with customers).
    pub total_loaned: i64,
    /// total_owned − total_loaned. May be negative.
    pub in_stock: i64,
    /// Customers with a non-zero balance, biggest debtors first.
    pub outstanding: Vec<Customer>,
}

impl Pos {
    /// Builds the crate panel: totals plus the outstanding-balance list.
    pub async fn crate_overview(&self) -> PosResult<CrateOverview> {
        let settings = self.store().settings().await?;
        let customers = self.store().customers().await?;

        let total_loaned: i64 = customers.iter().map(|c| c.crates_balance).sum();
        let in_stock = settings.total_crates - total_loaned;

        let mut outstanding: Vec<Customer> = customers
            .into_iter()
            .filter(|c| c.crates_balance != 0)
            .collect();
        outstanding.sort_by(|a, b| b.crates_balance.cmp(&a.crates_balance));

        Ok(CrateOverview {
            total_owned: settings.total_crates,
            total_loaned,
            in_stock,
            outstanding,
        })
    }

    /// Updates the company-owned crate count in settings.
    pub async fn set_total_crates(&self, total: i64) -> PosResult<SystemSettings> {
        validate_crate_count(total)?;

        let mut settings = self.store().settings().await?;
        settings.total_crates = total;
        self.store().save_settings(&settings).await?;
        Ok(settings)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, crates_balance: i64) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Cliente {}", id),
            phone: String::new(),
            email: None,
            address: None,
            crates_balance,
        }
    }

    #[test]
    fn test_crates_in_stock() {
        let settings = SystemSettings {
            total_crates: 100,
            ..SystemSettings::default()
        };
        let customers = vec![customer("a", 30), customer("b", 15), customer("c", 0)];

        assert_eq!(crates_in_stock(&settings, &customers), 55);
    }

    #[test]
    fn test_crates_in_stock_can_go_negative() {
        let settings = SystemSettings {
            total_crates: 10,
            ..SystemSettings::default()
        };
        let customers = vec![customer("a", 25)];

        assert_eq!(crates_in_stock(&settings, &customers), -15);
    }

    #[test]
    fn test_negative_balance_raises_in_stock() {
        // A customer holding a negative balance (returned more than taken)
        // adds to the derived stock figure
        let settings = SystemSettings {
            total_crates: 10,
            ..SystemSettings::default()
        };
        let customers = vec![customer("a", -5)];

        assert_eq!(crates_in_stock(&settings, &customers), 15);
    }
}
