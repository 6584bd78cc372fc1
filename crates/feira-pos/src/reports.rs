//! # Reports & Share Text
//!
//! Derived figures for the dashboard and the plain-text summaries handed
//! to sharing channels. Rendering a deep link or a PDF around these
//! strings is the caller's business; this module only composes the text.

use chrono::NaiveDate;
use serde::Serialize;

use feira_core::{Expense, Money, PaymentMethod, Sale, SaleStatus, SystemSettings};
use feira_store::EntityStore;

use crate::error::PosResult;
use crate::service::Pos;

// =============================================================================
// Summaries
// =============================================================================

/// Aggregate figures over a set of sales.
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    /// Non-cancelled sales counted.
    pub sale_count: usize,
    pub cancelled_count: usize,
    /// Σ totals of non-cancelled sales (pending credit included - it is
    /// revenue, just not received yet).
    pub gross: Money,
    /// Gross broken down by payment method, in method order.
    pub by_method: Vec<(PaymentMethod, Money)>,
}

/// One day of business: sales minus expenses.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub sales: SalesSummary,
    pub expense_total: Money,
    /// gross − expenses. Negative on a bad day.
    pub net: Money,
}

/// Aggregates a slice of sales. Cancelled sales are counted but excluded
/// from every money figure.
pub fn summarize_sales(sales: &[Sale]) -> SalesSummary {
    const METHODS: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Pix,
        PaymentMethod::Card,
        PaymentMethod::Credit,
    ];

    let cancelled_count = sales
        .iter()
        .filter(|s| s.status == SaleStatus::Cancelled)
        .count();
    let active: Vec<&Sale> = sales
        .iter()
        .filter(|s| s.status != SaleStatus::Cancelled)
        .collect();

    let gross: Money = active.iter().map(|s| s.total_amount()).sum();
    let by_method = METHODS
        .iter()
        .map(|method| {
            let total: Money = active
                .iter()
                .filter(|s| s.payment_method == *method)
                .map(|s| s.total_amount())
                .sum();
            (*method, total)
        })
        .collect();

    SalesSummary {
        sale_count: active.len(),
        cancelled_count,
        gross,
        by_method,
    }
}

impl Pos {
    /// One calendar day of sales and expenses.
    pub async fn daily_summary(&self, date: NaiveDate) -> PosResult<DailySummary> {
        let sales: Vec<Sale> = self
            .store()
            .sales()
            .await?
            .into_iter()
            .filter(|s| s.date.date_naive() == date)
            .collect();

        let expense_total: Money = self
            .store()
            .expenses()
            .await?
            .iter()
            .filter(|e| e.date.date_naive() == date)
            .map(Expense::amount)
            .sum();

        let sales = summarize_sales(&sales);
        let net = sales.gross - expense_total;

        Ok(DailySummary {
            date,
            sales,
            expense_total,
            net,
        })
    }
}

// =============================================================================
// Share text
// =============================================================================

/// Composes the shareable receipt text for a sale.
///
/// Bold/italic markers follow the messaging convention the business
/// already uses (*bold*, _italic_).
pub fn format_receipt(sale: &Sale, settings: &SystemSettings) -> String {
    let mut message = String::new();

    message.push_str(&format!("*{}*\n", settings.app_name));
    message.push_str("_Comprovante de Venda_\n\n");
    message.push_str(&format!("*Data:* {}\n", sale.date.format("%d/%m/%Y %H:%M")));
    message.push_str(&format!("*Cliente:* {}\n", sale.customer_name));
    message.push_str(&format!("*Vendedor:* {}\n\n", sale.seller_name));
    message.push_str("*ITENS:*\n");

    for item in &sale.items {
        message.push_str(&format!(
            "{}x {} - {}\n",
            item.quantity, item.product_name, item.total()
        ));
    }

    message.push_str("\n----------------\n");
    if sale.global_discount_cents > 0 {
        message.push_str(&format!(
            "Desconto: {}\n",
            Money::from_cents(sale.global_discount_cents)
        ));
    }
    if sale.global_surcharge_cents > 0 {
        message.push_str(&format!(
            "Acréscimo: {}\n",
            Money::from_cents(sale.global_surcharge_cents)
        ));
    }
    message.push_str(&format!("*TOTAL: {}*\n", sale.total_amount()));
    message.push_str(&format!(
        "*Forma de Pagto:* {}\n\n",
        sale.payment_method.label()
    ));
    message.push_str("_Obrigado pela preferência!_");

    message
}

/// Composes a one-message daily closing summary.
pub fn format_daily_summary(summary: &DailySummary, settings: &SystemSettings) -> String {
    let mut message = String::new();

    message.push_str(&format!("*{}*\n", settings.app_name));
    message.push_str(&format!(
        "_Fechamento do dia {}_\n\n",
        summary.date.format("%d/%m/%Y")
    ));
    message.push_str(&format!("Vendas: {}\n", summary.sales.sale_count));
    if summary.sales.cancelled_count > 0 {
        message.push_str(&format!("Canceladas: {}\n", summary.sales.cancelled_count));
    }
    message.push_str(&format!("*Bruto: {}*\n", summary.sales.gross));

    for (method, total) in &summary.sales.by_method {
        if total.is_positive() {
            message.push_str(&format!("  {}: {}\n", method.label(), total));
        }
    }

    message.push_str(&format!("Despesas: {}\n", summary.expense_total));
    message.push_str(&format!("*Líquido: {}*", summary.net));

    message
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use feira_core::SaleItem;

    fn sale(method: PaymentMethod, status: SaleStatus, total_cents: i64) -> Sale {
        Sale {
            id: "s1".to_string(),
            date: Utc::now(),
            customer_id: None,
            customer_name: "Cliente Balcão".to_string(),
            seller_id: "u1".to_string(),
            seller_name: "Ademir".to_string(),
            items: vec![SaleItem::new("p1", "Abacaxi", 4, total_cents / 4, 0, 0)],
            total_amount_cents: total_cents,
            global_discount_cents: 0,
            global_surcharge_cents: 0,
            payment_method: method,
            due_date: None,
            status,
            crates_in: 0,
            crates_out: 0,
        }
    }

    #[test]
    fn test_summarize_excludes_cancelled_from_money() {
        let sales = vec![
            sale(PaymentMethod::Cash, SaleStatus::Paid, 2000),
            sale(PaymentMethod::Pix, SaleStatus::Paid, 1000),
            sale(PaymentMethod::Cash, SaleStatus::Cancelled, 5000),
        ];

        let summary = summarize_sales(&sales);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.cancelled_count, 1);
        assert_eq!(summary.gross.cents(), 3000);

        let cash = summary
            .by_method
            .iter()
            .find(|(m, _)| *m == PaymentMethod::Cash)
            .unwrap();
        assert_eq!(cash.1.cents(), 2000);
    }

    #[test]
    fn test_pending_credit_counts_as_gross() {
        let sales = vec![sale(PaymentMethod::Credit, SaleStatus::Pending, 1500)];
        let summary = summarize_sales(&sales);
        assert_eq!(summary.gross.cents(), 1500);
    }

    #[test]
    fn test_format_receipt_contains_the_essentials() {
        let mut s = sale(PaymentMethod::Cash, SaleStatus::Paid, 2000);
        s.global_discount_cents = 200;
        let settings = SystemSettings::default();

        let text = format_receipt(&s, &settings);
        assert!(text.contains("Comprovante de Venda"));
        assert!(text.contains("4x Abacaxi"));
        assert!(text.contains("Desconto: R$ 2,00"));
        assert!(text.contains("*TOTAL: R$ 20,00*"));
        assert!(text.contains("DINHEIRO"));
        assert!(text.contains("Obrigado pela preferência!"));
    }

    #[test]
    fn test_format_receipt_omits_zero_discount() {
        let s = sale(PaymentMethod::Pix, SaleStatus::Paid, 2000);
        let text = format_receipt(&s, &SystemSettings::default());
        assert!(!text.contains("Desconto"));
        assert!(!text.contains("Acréscimo"));
    }

    #[test]
    fn test_format_daily_summary() {
        let sales = vec![
            sale(PaymentMethod::Cash, SaleStatus::Paid, 2000),
            sale(PaymentMethod::Credit, SaleStatus::Pending, 1500),
        ];
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            sales: summarize_sales(&sales),
            expense_total: Money::from_cents(500),
            net: Money::from_cents(3000),
        };

        let text = format_daily_summary(&summary, &SystemSettings::default());
        assert!(text.contains("Fechamento do dia 07/08/2026"));
        assert!(text.contains("Vendas: 2"));
        assert!(text.contains("*Bruto: R$ 35,00*"));
        assert!(text.contains("DINHEIRO: R$ 20,00"));
        assert!(text.contains("FIADO: R$ 15,00"));
        assert!(text.contains("*Líquido: R$ 30,00*"));
        assert!(!text.contains("Canceladas"));
    }
}
