//! # SQLite Store Implementation
//!
//! Implements the `EntityStore` contract on the SQLite pool.
//!
//! ## Layout
//! - Row structs (`sqlx::FromRow`) mirror the table columns and convert
//!   into feira-core types, parsing the stable enum strings
//! - Inherent methods on `SqliteStore` do the SQL work and return
//!   `DbResult`
//! - The trait impl at the bottom adapts them to the store contract
//!
//! ## Sale Lifecycle Transactions
//! ```text
//! commit_sale           cancel_sale
//! ───────────           ───────────
//! BEGIN                 BEGIN
//! INSERT sales          SELECT status  ── absent? → NotFound
//! INSERT sale_items ×N                 ── CANCELLED? → no-op
//! UPDATE products ×N    UPDATE sales SET status = 'CANCELLED'
//! UPDATE customers      UPDATE products ×N   (restore)
//! COMMIT                UPDATE customers     (reverse delta)
//!                       COMMIT
//! ```
//! A failure anywhere rolls the whole operation back, so stock and crate
//! figures never drift from the recorded sale history.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use feira_core::{
    Customer, CustomerPayment, DamagedGood, Expense, ExpenseCategory, PaymentMethod, Product,
    Sale, SaleItem, SaleStatus, SystemSettings, User, UserRole, AD_HOC_PRODUCT_ID,
    DEFAULT_SETTINGS_ID,
};
use feira_store::{EntityStore, StoreResult};

use crate::error::{DbError, DbResult};
use crate::pool::SqliteStore;

// =============================================================================
// Row Structs
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    id: String,
    app_name: String,
    maintenance_mode: bool,
    total_crates: i64,
}

impl From<SettingsRow> for SystemSettings {
    fn from(row: SettingsRow) -> Self {
        SystemSettings {
            id: row.id,
            app_name: row.app_name,
            maintenance_mode: row.maintenance_mode,
            total_crates: row.total_crates,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    username: String,
    email: String,
    role: String,
    password_hash: Option<String>,
}

impl UserRow {
    fn into_user(self) -> DbResult<User> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| DbError::Internal(format!("invalid user role '{}'", self.role)))?;
        Ok(User {
            id: self.id,
            name: self.name,
            username: self.username,
            email: self.email,
            role,
            password_hash: self.password_hash,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    cost_price_cents: i64,
    stock: i64,
    category: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
            cost_price_cents: row.cost_price_cents,
            stock: row.stock,
            category: row.category,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: String,
    email: Option<String>,
    address: Option<String>,
    crates_balance: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            crates_balance: row.crates_balance,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: DateTime<Utc>,
    customer_id: Option<String>,
    customer_name: String,
    seller_id: String,
    seller_name: String,
    total_amount_cents: i64,
    global_discount_cents: i64,
    global_surcharge_cents: i64,
    payment_method: String,
    due_date: Option<DateTime<Utc>>,
    status: String,
    crates_in: i64,
    crates_out: i64,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleItem>) -> DbResult<Sale> {
        let payment_method = PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
            DbError::Internal(format!(
                "invalid payment method '{}'",
                self.payment_method
            ))
        })?;
        let status = SaleStatus::parse(&self.status)
            .ok_or_else(|| DbError::Internal(format!("invalid sale status '{}'", self.status)))?;

        Ok(Sale {
            id: self.id,
            date: self.date,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            seller_id: self.seller_id,
            seller_name: self.seller_name,
            items,
            total_amount_cents: self.total_amount_cents,
            global_discount_cents: self.global_discount_cents,
            global_surcharge_cents: self.global_surcharge_cents,
            payment_method,
            due_date: self.due_date,
            status,
            crates_in: self.crates_in,
            crates_out: self.crates_out,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    sale_id: String,
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price_cents: i64,
    discount_cents: i64,
    surcharge_cents: i64,
    total_cents: i64,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        SaleItem {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            discount_cents: row.discount_cents,
            surcharge_cents: row.surcharge_cents,
            total_cents: row.total_cents,
        }
    }
}

const SALE_ITEM_COLUMNS: &str = "sale_id, product_id, product_name, quantity, \
     unit_price_cents, discount_cents, surcharge_cents, total_cents";

#[derive(Debug, sqlx::FromRow)]
struct CustomerPaymentRow {
    id: String,
    date: DateTime<Utc>,
    customer_id: String,
    customer_name: String,
    amount_cents: i64,
    method: String,
    notes: Option<String>,
}

impl CustomerPaymentRow {
    fn into_payment(self) -> DbResult<CustomerPayment> {
        let method = PaymentMethod::parse(&self.method)
            .ok_or_else(|| DbError::Internal(format!("invalid payment method '{}'", self.method)))?;
        Ok(CustomerPayment {
            id: self.id,
            date: self.date,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            amount_cents: self.amount_cents,
            method,
            notes: self.notes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DamagedGoodRow {
    id: String,
    date: DateTime<Utc>,
    product_id: String,
    product_name: String,
    quantity: i64,
    reason: String,
}

impl From<DamagedGoodRow> for DamagedGood {
    fn from(row: DamagedGoodRow) -> Self {
        DamagedGood {
            id: row.id,
            date: row.date,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            reason: row.reason,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    date: DateTime<Utc>,
    description: String,
    amount_cents: i64,
    category: String,
}

impl ExpenseRow {
    fn into_expense(self) -> DbResult<Expense> {
        let category = ExpenseCategory::parse(&self.category).ok_or_else(|| {
            DbError::Internal(format!("invalid expense category '{}'", self.category))
        })?;
        Ok(Expense {
            id: self.id,
            date: self.date,
            description: self.description,
            amount_cents: self.amount_cents,
            category,
        })
    }
}

// =============================================================================
// SQL operations
// =============================================================================

impl SqliteStore {
    async fn get_settings(&self) -> DbResult<SystemSettings> {
        let row: Option<SettingsRow> = sqlx::query_as(
            "SELECT id, app_name, maintenance_mode, total_crates FROM settings WHERE id = ?1",
        )
        .bind(DEFAULT_SETTINGS_ID)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into).unwrap_or_default())
    }

    async fn put_settings(&self, settings: &SystemSettings) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO settings (id, app_name, maintenance_mode, total_crates) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(id) DO UPDATE SET \
                 app_name = excluded.app_name, \
                 maintenance_mode = excluded.maintenance_mode, \
                 total_crates = excluded.total_crates",
        )
        .bind(&settings.id)
        .bind(&settings.app_name)
        .bind(settings.maintenance_mode)
        .bind(settings.total_crates)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn list_users(&self) -> DbResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, name, username, email, role, password_hash FROM users ORDER BY name",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn put_user(&self, user: &User) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, username, email, role, password_hash) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, \
                 username = excluded.username, \
                 email = excluded.email, \
                 role = excluded.role, \
                 password_hash = excluded.password_hash",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_user(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn list_products(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, price_cents, cost_price_cents, stock, category, image_url, \
                    created_at, updated_at \
             FROM products ORDER BY name",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, price_cents, cost_price_cents, stock, category, image_url, \
                    created_at, updated_at \
             FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn put_product(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Saving product");

        sqlx::query(
            "INSERT INTO products (id, name, price_cents, cost_price_cents, stock, category, \
                                   image_url, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, \
                 price_cents = excluded.price_cents, \
                 cost_price_cents = excluded.cost_price_cents, \
                 stock = excluded.stock, \
                 category = excluded.category, \
                 image_url = excluded.image_url, \
                 updated_at = excluded.updated_at",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_product(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn list_customers(&self) -> DbResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            "SELECT id, name, phone, email, address, crates_balance \
             FROM customers ORDER BY name",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_customer(&self, id: &str) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT id, name, phone, email, address, crates_balance \
             FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn put_customer(&self, customer: &Customer) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO customers (id, name, phone, email, address, crates_balance) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, \
                 phone = excluded.phone, \
                 email = excluded.email, \
                 address = excluded.address, \
                 crates_balance = excluded.crates_balance",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.crates_balance)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        let sale_rows: Vec<SaleRow> = sqlx::query_as(
            "SELECT id, date, customer_id, customer_name, seller_id, seller_name, \
                    total_amount_cents, global_discount_cents, global_surcharge_cents, \
                    payment_method, due_date, status, crates_in, crates_out \
             FROM sales ORDER BY date",
        )
        .fetch_all(self.pool())
        .await?;

        let item_rows: Vec<SaleItemRow> = sqlx::query_as(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items ORDER BY sale_id, position"
        ))
        .fetch_all(self.pool())
        .await?;

        let mut items_by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();
        for row in item_rows {
            let sale_id = row.sale_id.clone();
            items_by_sale.entry(sale_id).or_default().push(row.into());
        }

        sale_rows
            .into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(items)
            })
            .collect()
    }

    async fn get_sale(&self, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(
            "SELECT id, date, customer_id, customer_name, seller_id, seller_name, \
                    total_amount_cents, global_discount_cents, global_surcharge_cents, \
                    payment_method, due_date, status, crates_in, crates_out \
             FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows: Vec<SaleItemRow> = sqlx::query_as(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY position"
        ))
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        Ok(Some(
            row.into_sale(item_rows.into_iter().map(Into::into).collect())?,
        ))
    }

    /// Persists a sale and applies its stock/crate effects in one
    /// transaction.
    async fn insert_sale(&self, mut sale: Sale) -> DbResult<Sale> {
        if sale.id.is_empty() {
            sale.id = Uuid::new_v4().to_string();
        }

        debug!(id = %sale.id, total = sale.total_amount_cents, "Committing sale");

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO sales (id, date, customer_id, customer_name, seller_id, seller_name, \
                                total_amount_cents, global_discount_cents, \
                                global_surcharge_cents, payment_method, due_date, status, \
                                crates_in, crates_out) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&sale.id)
        .bind(sale.date)
        .bind(&sale.customer_id)
        .bind(&sale.customer_name)
        .bind(&sale.seller_id)
        .bind(&sale.seller_name)
        .bind(sale.total_amount_cents)
        .bind(sale.global_discount_cents)
        .bind(sale.global_surcharge_cents)
        .bind(sale.payment_method.as_str())
        .bind(sale.due_date)
        .bind(sale.status.as_str())
        .bind(sale.crates_in)
        .bind(sale.crates_out)
        .execute(&mut *tx)
        .await?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO sale_items (id, sale_id, position, product_id, product_name, \
                                         quantity, unit_price_cents, discount_cents, \
                                         surcharge_cents, total_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.discount_cents)
            .bind(item.surcharge_cents)
            .bind(item.total_cents)
            .execute(&mut *tx)
            .await?;
        }

        // Stock decrements - inventory lines only, no floor
        for item in &sale.items {
            if item.is_ad_hoc() {
                continue;
            }
            sqlx::query("UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3")
                .bind(item.quantity)
                .bind(Utc::now())
                .bind(&item.product_id)
                .execute(&mut *tx)
                .await?;
        }

        // Crate balance delta
        if let Some(customer_id) = &sale.customer_id {
            if sale.has_crate_movement() {
                sqlx::query(
                    "UPDATE customers SET crates_balance = crates_balance + ?1 WHERE id = ?2",
                )
                .bind(sale.crate_delta())
                .bind(customer_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(sale)
    }

    /// Cancels a sale and reverses its effects in one transaction.
    async fn cancel_sale_by_id(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool().begin().await?;

        let status: Option<String> = sqlx::query_scalar("SELECT status FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let status = status.ok_or_else(|| DbError::not_found("Sale", id))?;

        // Idempotent: cancelling twice changes nothing
        if status == SaleStatus::Cancelled.as_str() {
            return Ok(());
        }

        debug!(id = %id, "Cancelling sale");

        sqlx::query("UPDATE sales SET status = ?1 WHERE id = ?2")
            .bind(SaleStatus::Cancelled.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let item_rows: Vec<SaleItemRow> = sqlx::query_as(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY position"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // Restore stock - inventory lines only
        for row in &item_rows {
            if row.product_id == AD_HOC_PRODUCT_ID {
                continue;
            }
            sqlx::query("UPDATE products SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3")
                .bind(row.quantity)
                .bind(Utc::now())
                .bind(&row.product_id)
                .execute(&mut *tx)
                .await?;
        }

        // Reverse the crate delta
        let (customer_id, crates_in, crates_out): (Option<String>, i64, i64) =
            sqlx::query_as("SELECT customer_id, crates_in, crates_out FROM sales WHERE id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(customer_id) = customer_id {
            sqlx::query("UPDATE customers SET crates_balance = crates_balance - ?1 WHERE id = ?2")
                .bind(crates_out - crates_in)
                .bind(&customer_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Settles a pending credit sale ("baixar nota").
    async fn settle_sale(&self, id: &str) -> DbResult<()> {
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        let status = status.ok_or_else(|| DbError::not_found("Sale", id))?;

        if status == SaleStatus::Paid.as_str() {
            return Ok(());
        }
        if status == SaleStatus::Cancelled.as_str() {
            return Err(DbError::InvalidStatus {
                id: id.to_string(),
                status,
            });
        }

        debug!(id = %id, "Marking sale as paid");

        sqlx::query("UPDATE sales SET status = ?1 WHERE id = ?2")
            .bind(SaleStatus::Paid.as_str())
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn list_payments(&self) -> DbResult<Vec<CustomerPayment>> {
        let rows: Vec<CustomerPaymentRow> = sqlx::query_as(
            "SELECT id, date, customer_id, customer_name, amount_cents, method, notes \
             FROM customer_payments ORDER BY date",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(CustomerPaymentRow::into_payment)
            .collect()
    }

    async fn put_payment(&self, payment: &CustomerPayment) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO customer_payments (id, date, customer_id, customer_name, \
                                            amount_cents, method, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT(id) DO UPDATE SET \
                 amount_cents = excluded.amount_cents, \
                 method = excluded.method, \
                 notes = excluded.notes",
        )
        .bind(&payment.id)
        .bind(payment.date)
        .bind(&payment.customer_id)
        .bind(&payment.customer_name)
        .bind(payment.amount_cents)
        .bind(payment.method.as_str())
        .bind(&payment.notes)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_payment(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM customer_payments WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn list_damaged(&self) -> DbResult<Vec<DamagedGood>> {
        let rows: Vec<DamagedGoodRow> = sqlx::query_as(
            "SELECT id, date, product_id, product_name, quantity, reason \
             FROM damaged_goods ORDER BY date",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Inserts a write-off and floors the product's stock at zero, in one
    /// transaction.
    async fn insert_damaged(&self, mut damaged: DamagedGood) -> DbResult<DamagedGood> {
        if damaged.id.is_empty() {
            damaged.id = Uuid::new_v4().to_string();
        }

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO damaged_goods (id, date, product_id, product_name, quantity, reason) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&damaged.id)
        .bind(damaged.date)
        .bind(&damaged.product_id)
        .bind(&damaged.product_name)
        .bind(damaged.quantity)
        .bind(&damaged.reason)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE products SET stock = MAX(stock - ?1, 0), updated_at = ?2 WHERE id = ?3",
        )
        .bind(damaged.quantity)
        .bind(Utc::now())
        .bind(&damaged.product_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(damaged)
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            "SELECT id, date, description, amount_cents, category \
             FROM expenses ORDER BY date",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    async fn put_expense(&self, expense: &Expense) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO expenses (id, date, description, amount_cents, category) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(id) DO UPDATE SET \
                 date = excluded.date, \
                 description = excluded.description, \
                 amount_cents = excluded.amount_cents, \
                 category = excluded.category",
        )
        .bind(&expense.id)
        .bind(expense.date)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.category.as_str())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_expense(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

// =============================================================================
// EntityStore contract
// =============================================================================

#[async_trait]
impl EntityStore for SqliteStore {
    async fn settings(&self) -> StoreResult<SystemSettings> {
        Ok(self.get_settings().await?)
    }

    async fn save_settings(&self, settings: &SystemSettings) -> StoreResult<()> {
        Ok(self.put_settings(settings).await?)
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.list_users().await?)
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        Ok(self.put_user(user).await?)
    }

    async fn delete_user(&self, id: &str) -> StoreResult<()> {
        Ok(self.remove_user(id).await?)
    }

    async fn products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.list_products().await?)
    }

    async fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.get_product(id).await?)
    }

    async fn save_product(&self, product: &Product) -> StoreResult<()> {
        Ok(self.put_product(product).await?)
    }

    async fn delete_product(&self, id: &str) -> StoreResult<()> {
        Ok(self.remove_product(id).await?)
    }

    async fn customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.list_customers().await?)
    }

    async fn customer(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.get_customer(id).await?)
    }

    async fn save_customer(&self, customer: &Customer) -> StoreResult<()> {
        Ok(self.put_customer(customer).await?)
    }

    async fn sales(&self) -> StoreResult<Vec<Sale>> {
        Ok(self.list_sales().await?)
    }

    async fn sale(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.get_sale(id).await?)
    }

    async fn commit_sale(&self, sale: Sale) -> StoreResult<Sale> {
        Ok(self.insert_sale(sale).await?)
    }

    async fn cancel_sale(&self, id: &str) -> StoreResult<()> {
        Ok(self.cancel_sale_by_id(id).await?)
    }

    async fn mark_sale_paid(&self, id: &str) -> StoreResult<()> {
        Ok(self.settle_sale(id).await?)
    }

    async fn customer_payments(&self) -> StoreResult<Vec<CustomerPayment>> {
        Ok(self.list_payments().await?)
    }

    async fn save_customer_payment(&self, payment: &CustomerPayment) -> StoreResult<()> {
        Ok(self.put_payment(payment).await?)
    }

    async fn delete_customer_payment(&self, id: &str) -> StoreResult<()> {
        Ok(self.remove_payment(id).await?)
    }

    async fn damaged_goods(&self) -> StoreResult<Vec<DamagedGood>> {
        Ok(self.list_damaged().await?)
    }

    async fn save_damaged_good(&self, damaged: DamagedGood) -> StoreResult<DamagedGood> {
        Ok(self.insert_damaged(damaged).await?)
    }

    async fn expenses(&self) -> StoreResult<Vec<Expense>> {
        Ok(self.list_expenses().await?)
    }

    async fn save_expense(&self, expense: &Expense) -> StoreResult<()> {
        Ok(self.put_expense(expense).await?)
    }

    async fn delete_expense(&self, id: &str) -> StoreResult<()> {
        Ok(self.remove_expense(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
