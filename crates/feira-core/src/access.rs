//! # Access Control
//!
//! Capability-set checks gating back-office areas by user role.
//!
//! One function answers "can this role open this tab?" so every surface
//! (view routing, report export, admin actions) asks the same question
//! instead of scattering per-view conditionals.

use serde::{Deserialize, Serialize};

use crate::types::UserRole;

/// The navigable areas of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Pos,
    Products,
    Customers,
    CreditSales,
    Crates,
    DamagedGoods,
    Expenses,
    Analytics,
    Settings,
    Users,
}

impl Tab {
    /// All tabs, in navigation order.
    pub const ALL: [Tab; 10] = [
        Tab::Pos,
        Tab::Products,
        Tab::Customers,
        Tab::CreditSales,
        Tab::Crates,
        Tab::DamagedGoods,
        Tab::Expenses,
        Tab::Analytics,
        Tab::Settings,
        Tab::Users,
    ];
}

/// Whether `role` may open `tab`.
///
/// ## Capability Matrix
/// ```text
/// Admin     → everything
/// Financial → everything except Users and Settings
/// Seller    → Pos, Customers, CreditSales, Crates, DamagedGoods
/// ```
pub fn can_access(role: UserRole, tab: Tab) -> bool {
    match role {
        UserRole::Admin => true,
        UserRole::Financial => !matches!(tab, Tab::Users | Tab::Settings),
        UserRole::Seller => matches!(
            tab,
            Tab::Pos | Tab::Customers | Tab::CreditSales | Tab::Crates | Tab::DamagedGoods
        ),
    }
}

/// The tab a user lands on after sign-in.
pub fn default_tab(role: UserRole) -> Tab {
    match role {
        UserRole::Seller => Tab::Pos,
        _ => Tab::Analytics,
    }
}

/// All tabs visible to a role, in navigation order.
pub fn accessible_tabs(role: UserRole) -> Vec<Tab> {
    Tab::ALL
        .iter()
        .copied()
        .filter(|tab| can_access(role, *tab))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_sees_everything() {
        for tab in Tab::ALL {
            assert!(can_access(UserRole::Admin, tab));
        }
    }

    #[test]
    fn test_financial_blocked_from_admin_areas() {
        assert!(!can_access(UserRole::Financial, Tab::Users));
        assert!(!can_access(UserRole::Financial, Tab::Settings));
        assert!(can_access(UserRole::Financial, Tab::Analytics));
        assert!(can_access(UserRole::Financial, Tab::Expenses));
    }

    #[test]
    fn test_seller_capabilities() {
        assert!(can_access(UserRole::Seller, Tab::Pos));
        assert!(can_access(UserRole::Seller, Tab::Crates));
        assert!(!can_access(UserRole::Seller, Tab::Analytics));
        assert!(!can_access(UserRole::Seller, Tab::Users));
        assert!(!can_access(UserRole::Seller, Tab::Expenses));
    }

    #[test]
    fn test_default_tab() {
        assert_eq!(default_tab(UserRole::Seller), Tab::Pos);
        assert_eq!(default_tab(UserRole::Admin), Tab::Analytics);
    }

    #[test]
    fn test_accessible_tabs_ordering() {
        let tabs = accessible_tabs(UserRole::Seller);
        assert_eq!(tabs.first(), Some(&Tab::Pos));
        assert_eq!(tabs.len(), 5);
    }
}
