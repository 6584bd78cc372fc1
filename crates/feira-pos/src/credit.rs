//! # Credit Settlement ("fiado")
//!
//! Two independent operations, deliberately NOT unified:
//!
//! - `mark_sale_paid` settles one specific pending sale ("baixar nota").
//!   It never creates a payment record.
//! - `record_customer_payment` inserts a standalone abatement against the
//!   customer's aggregate debt. It never flips any sale to Paid.
//!
//! The customer's net pending debt is a derived figure, recomputed on
//! read: `max(0, Σ pending credit sales − Σ payments)`. A customer can
//! still show pending notes after enough aggregate payments have covered
//! them - the two views reconcile by totals only, never by linkage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use feira_core::validation::validate_payment_amount;
use feira_core::{
    CoreError, CustomerPayment, Money, PaymentMethod, Sale, SaleStatus, ValidationError,
};
use feira_store::EntityStore;

use crate::error::PosResult;
use crate::service::Pos;

/// The credit panel numbers for one customer.
#[derive(Debug, Clone, Serialize)]
pub struct CreditSummary {
    /// Pending credit sales ("notas em aberto"), oldest first.
    pub pending_sales: Vec<Sale>,
    /// Abatements recorded for this customer, oldest first.
    pub payments: Vec<CustomerPayment>,
    /// Σ totals of the pending sales.
    pub pending_total: Money,
    /// Σ payment amounts.
    pub received_total: Money,
    /// max(0, pending − received). Never negative, even on overpayment.
    pub net_pending: Money,
}

impl Pos {
    /// Settles a pending credit sale ("baixar nota").
    ///
    /// Stock and crates were applied at commit time and stay untouched.
    /// No payment record is created.
    pub async fn mark_sale_paid(&self, id: &str) -> PosResult<()> {
        Ok(self.store().mark_sale_paid(id).await?)
    }

    /// Records a standalone payment against a customer's aggregate debt.
    ///
    /// Snapshots the customer name; rejects non-positive amounts and the
    /// Credit method (a tab cannot be paid with more tab). Never marks
    /// any specific sale as paid.
    pub async fn record_customer_payment(
        &self,
        customer_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
        date: DateTime<Utc>,
        notes: Option<String>,
    ) -> PosResult<CustomerPayment> {
        validate_payment_amount(amount_cents)?;
        if method == PaymentMethod::Credit {
            return Err(ValidationError::NotAllowed {
                field: "method".to_string(),
                allowed: vec![
                    PaymentMethod::Cash.as_str().to_string(),
                    PaymentMethod::Pix.as_str().to_string(),
                    PaymentMethod::Card.as_str().to_string(),
                ],
            }
            .into());
        }

        let customer = self
            .store()
            .customer(customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        let payment = CustomerPayment {
            id: Uuid::new_v4().to_string(),
            date,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            amount_cents,
            method,
            notes,
        };

        info!(customer = %customer.name, amount = amount_cents, "Customer payment recorded");
        self.store().save_customer_payment(&payment).await?;
        Ok(payment)
    }

    /// Removes a mistakenly entered payment.
    pub async fn delete_customer_payment(&self, id: &str) -> PosResult<()> {
        Ok(self.store().delete_customer_payment(id).await?)
    }

    /// All recorded payments, oldest first.
    pub async fn customer_payments(&self) -> PosResult<Vec<CustomerPayment>> {
        Ok(self.store().customer_payments().await?)
    }

    /// The credit panel for one customer: pending notes, payments, and
    /// the derived net figure.
    pub async fn credit_summary(&self, customer_id: &str) -> PosResult<CreditSummary> {
        let pending_sales: Vec<Sale> = self
            .store()
            .sales()
            .await?
            .into_iter()
            .filter(|s| {
                s.customer_id.as_deref() == Some(customer_id)
                    && s.payment_method == PaymentMethod::Credit
                    && s.status == SaleStatus::Pending
            })
            .collect();

        let payments: Vec<CustomerPayment> = self
            .store()
            .customer_payments()
            .await?
            .into_iter()
            .filter(|p| p.customer_id == customer_id)
            .collect();

        let pending_total: Money = pending_sales.iter().map(Sale::total_amount).sum();
        let received_total: Money = payments.iter().map(CustomerPayment::amount).sum();
        let net_pending = (pending_total - received_total).clamp_non_negative();

        Ok(CreditSummary {
            pending_sales,
            payments,
            pending_total,
            received_total,
            net_pending,
        })
    }

    /// max(0, Σ pending credit sales − Σ payments) for one customer.
    pub async fn net_pending_debt(&self, customer_id: &str) -> PosResult<Money> {
        Ok(self.credit_summary(customer_id).await?.net_pending)
    }
}
