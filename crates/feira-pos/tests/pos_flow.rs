//! End-to-end flows over the in-memory backend: build a cart, commit,
//! settle, cancel, and read the derived figures back.

use std::sync::Arc;

use chrono::Utc;

use feira_core::{Cart, CoreError, PaymentMethod, SaleStatus, User, UserRole};
use feira_pos::{CheckoutRequest, EntityStore, MemoryStore, Pos, PosError};
use feira_store::StoreError;

fn seller() -> User {
    User {
        id: "u-vendedor".to_string(),
        name: "Ademir".to_string(),
        username: "ademir".to_string(),
        email: "ademir@feira.com".to_string(),
        role: UserRole::Seller,
        password_hash: None,
    }
}

fn pos() -> Pos {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Pos::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn cash_sale_commit_and_cancel_round_trip() {
    let pos = pos();
    let seller = seller();

    // Abacaxi: 20 in stock at R$ 5,00
    let abacaxi = pos
        .create_product("Abacaxi", 500, 250, 20, "fruta", None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_line(&abacaxi, 4).unwrap();
    cart.set_global_discount_cents(200).unwrap();
    assert_eq!(cart.grand_total_cents(), 1800); // 4×5,00 − 2,00

    let sale = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Cash,
            customer: None,
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(sale.total_amount_cents, 1800);
    assert_eq!(sale.customer_name, "Cliente Balcão");
    assert_eq!(
        pos.store().product(&abacaxi.id).await.unwrap().unwrap().stock,
        16
    );

    pos.cancel_sale(&sale.id).await.unwrap();

    let cancelled = pos.sale(&sale.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, SaleStatus::Cancelled);
    assert_eq!(
        pos.store().product(&abacaxi.id).await.unwrap().unwrap().stock,
        20
    );
}

#[tokio::test]
async fn credit_sale_without_customer_is_rejected_before_persistence() {
    let pos = pos();
    let seller = seller();

    let product = pos
        .create_product("Manga", 300, 150, 10, "fruta", None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_line(&product, 2).unwrap();

    let err = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Credit,
            customer: None,
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PosError::Core(CoreError::CustomerRequired)));

    // Nothing was persisted, nothing was mutated
    assert!(pos.sales().await.unwrap().is_empty());
    assert_eq!(
        pos.store().product(&product.id).await.unwrap().unwrap().stock,
        10
    );
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let pos = pos();
    let seller = seller();
    let cart = Cart::new();

    let err = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Cash,
            customer: None,
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PosError::Core(CoreError::EmptyCart)));
}

#[tokio::test]
async fn crate_movement_round_trip() {
    let pos = pos();
    let seller = seller();

    let customer = pos
        .create_customer("Mercado do Zé", "11988887777", None, None)
        .await
        .unwrap();
    let product = pos
        .create_product("Polpa de Caju", 800, 400, 50, "polpa", None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_line(&product, 10).unwrap();

    // 5 crates out, 2 back: balance should rise by 3
    let sale = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Pix,
            customer: Some(&customer),
            seller: &seller,
            crates_in: 2,
            crates_out: 5,
            due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(
        pos.store()
            .customer(&customer.id)
            .await
            .unwrap()
            .unwrap()
            .crates_balance,
        3
    );

    let overview = pos.crate_overview().await.unwrap();
    assert_eq!(overview.total_loaned, 3);
    assert_eq!(overview.outstanding.len(), 1);

    pos.cancel_sale(&sale.id).await.unwrap();
    assert_eq!(
        pos.store()
            .customer(&customer.id)
            .await
            .unwrap()
            .unwrap()
            .crates_balance,
        0
    );
}

#[tokio::test]
async fn cancelling_twice_is_a_quiet_no_op() {
    let pos = pos();
    let seller = seller();

    let product = pos
        .create_product("Maracujá", 600, 300, 12, "fruta", None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_line(&product, 3).unwrap();

    let sale = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Card,
            customer: None,
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: None,
        })
        .await
        .unwrap();

    pos.cancel_sale(&sale.id).await.unwrap();
    pos.cancel_sale(&sale.id).await.unwrap();
    pos.cancel_sale(&sale.id).await.unwrap();

    assert_eq!(
        pos.store().product(&product.id).await.unwrap().unwrap().stock,
        12
    );
    assert_eq!(
        pos.sale(&sale.id).await.unwrap().unwrap().status,
        SaleStatus::Cancelled
    );
}

#[tokio::test]
async fn ad_hoc_lines_never_touch_inventory() {
    let pos = pos();
    let seller = seller();

    let product = pos
        .create_product("Abacaxi", 500, 250, 20, "fruta", None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_ad_hoc_line("caixa fechada sortida", 15_000).unwrap();

    let sale = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Cash,
            customer: None,
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(
        pos.store().product(&product.id).await.unwrap().unwrap().stock,
        20
    );

    pos.cancel_sale(&sale.id).await.unwrap();
    assert_eq!(
        pos.store().product(&product.id).await.unwrap().unwrap().stock,
        20
    );
}

#[tokio::test]
async fn net_pending_debt_is_aggregate_and_never_negative() {
    let pos = pos();
    let seller = seller();

    let customer = pos
        .create_customer("Quitanda da Ana", "11977776666", None, None)
        .await
        .unwrap();
    let product = pos
        .create_product("Banana Prata", 400, 200, 100, "fruta", None)
        .await
        .unwrap();

    // Two credit notes: 25×4,00 = 100,00 and 12×4,00 = 48,00
    for qty in [25, 12] {
        let mut cart = Cart::new();
        cart.add_line(&product, qty).unwrap();
        pos.checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Credit,
            customer: Some(&customer),
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: Some(Utc::now()),
        })
        .await
        .unwrap();
    }

    let summary = pos.credit_summary(&customer.id).await.unwrap();
    assert_eq!(summary.pending_sales.len(), 2);
    assert_eq!(summary.pending_total.cents(), 14_800);
    assert_eq!(summary.net_pending.cents(), 14_800);

    // Partial abatement: R$ 70,00
    pos.record_customer_payment(
        &customer.id,
        7_000,
        PaymentMethod::Pix,
        Utc::now(),
        Some("adiantamento".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(pos.net_pending_debt(&customer.id).await.unwrap().cents(), 7_800);

    // Payments never flip individual notes
    let summary = pos.credit_summary(&customer.id).await.unwrap();
    assert_eq!(summary.pending_sales.len(), 2);

    // Overpayment floors at zero
    pos.record_customer_payment(&customer.id, 20_000, PaymentMethod::Cash, Utc::now(), None)
        .await
        .unwrap();
    assert_eq!(pos.net_pending_debt(&customer.id).await.unwrap().cents(), 0);
}

#[tokio::test]
async fn paying_a_tab_with_credit_is_rejected() {
    let pos = pos();
    let customer = pos
        .create_customer("Quitanda da Ana", "11977776666", None, None)
        .await
        .unwrap();

    let err = pos
        .record_customer_payment(&customer.id, 1_000, PaymentMethod::Credit, Utc::now(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PosError::Core(CoreError::Validation(_))));
}

#[tokio::test]
async fn settling_a_note_changes_only_its_status() {
    let pos = pos();
    let seller = seller();

    let customer = pos
        .create_customer("Mercado do Zé", "11988887777", None, None)
        .await
        .unwrap();
    let product = pos
        .create_product("Mamão Formosa", 700, 350, 30, "fruta", None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_line(&product, 5).unwrap();

    let sale = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Credit,
            customer: Some(&customer),
            seller: &seller,
            crates_in: 0,
            crates_out: 3,
            due_date: Some(Utc::now()),
        })
        .await
        .unwrap();
    assert_eq!(sale.status, SaleStatus::Pending);

    let stock_before = pos.store().product(&product.id).await.unwrap().unwrap().stock;
    let crates_before = pos
        .store()
        .customer(&customer.id)
        .await
        .unwrap()
        .unwrap()
        .crates_balance;

    pos.mark_sale_paid(&sale.id).await.unwrap();

    let settled = pos.sale(&sale.id).await.unwrap().unwrap();
    assert_eq!(settled.status, SaleStatus::Paid);
    // Stock and crates were applied at commit time - settling moves nothing
    assert_eq!(
        pos.store().product(&product.id).await.unwrap().unwrap().stock,
        stock_before
    );
    assert_eq!(
        pos.store()
            .customer(&customer.id)
            .await
            .unwrap()
            .unwrap()
            .crates_balance,
        crates_before
    );
    // No payment record was created
    assert!(pos.customer_payments().await.unwrap().is_empty());

    // A cancelled note cannot be settled
    pos.cancel_sale(&sale.id).await.unwrap();
    let err = pos.mark_sale_paid(&sale.id).await.unwrap_err();
    assert!(matches!(err, PosError::Store(StoreError::InvalidStatus { .. })));
}

#[tokio::test]
async fn sign_in_gating_and_maintenance_mode() {
    let pos = pos();

    let admin = pos
        .bootstrap_admin("Dona Marta", "marta", "marta@feira.com", "senha-forte")
        .await
        .unwrap()
        .expect("first boot seeds the admin");
    // Second boot is a no-op
    assert!(pos
        .bootstrap_admin("Outro", "outro", "outro@feira.com", "x")
        .await
        .unwrap()
        .is_none());

    pos.create_user(
        "Ademir",
        "ademir",
        "ademir@feira.com",
        UserRole::Seller,
        "abacaxi123",
    )
    .await
    .unwrap();

    // Happy paths: by username and by email
    let session = pos.sign_in("ademir", "abacaxi123").await.unwrap();
    assert_eq!(session.user.role, UserRole::Seller);
    assert!(session.can_access(feira_core::access::Tab::Pos));
    assert!(!session.can_access(feira_core::access::Tab::Users));
    pos.sign_in("marta@feira.com", "senha-forte").await.unwrap();

    // Wrong password and unknown login read the same
    assert!(matches!(
        pos.sign_in("ademir", "errada").await.unwrap_err(),
        PosError::InvalidCredentials
    ));
    assert!(matches!(
        pos.sign_in("ninguem", "x").await.unwrap_err(),
        PosError::InvalidCredentials
    ));

    // Maintenance mode locks sellers out, not admins
    let mut settings = pos.settings().await.unwrap();
    settings.maintenance_mode = true;
    pos.save_settings(&settings).await.unwrap();

    assert!(matches!(
        pos.sign_in("ademir", "abacaxi123").await.unwrap_err(),
        PosError::Maintenance
    ));
    pos.sign_in(&admin.username, "senha-forte").await.unwrap();
}

#[tokio::test]
async fn recent_sales_hides_cancelled_and_sorts_newest_first() {
    let pos = pos();
    let seller = seller();

    let product = pos
        .create_product("Abacaxi", 500, 250, 100, "fruta", None)
        .await
        .unwrap();

    let mut ids = Vec::new();
    for qty in [1, 2, 3] {
        let mut cart = Cart::new();
        cart.add_line(&product, qty).unwrap();
        let sale = pos
            .checkout(CheckoutRequest {
                cart: &cart,
                payment_method: PaymentMethod::Cash,
                customer: None,
                seller: &seller,
                crates_in: 0,
                crates_out: 0,
                due_date: None,
            })
            .await
            .unwrap();
        ids.push(sale.id);
    }

    pos.cancel_sale(&ids[1]).await.unwrap();

    let recent = pos.recent_sales(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|s| s.status != SaleStatus::Cancelled));
    assert!(recent[0].date >= recent[1].date);
}

#[tokio::test]
async fn receipt_text_for_a_committed_sale() {
    let pos = pos();
    let seller = seller();

    let product = pos
        .create_product("Abacaxi Pérola", 500, 250, 20, "fruta", None)
        .await
        .unwrap();

    let customer = pos
        .create_customer("Quitanda da Ana", "11977776666", None, None)
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.add_line(&product, 4).unwrap();
    cart.set_global_discount_cents(200).unwrap();

    let sale = pos
        .checkout(CheckoutRequest {
            cart: &cart,
            payment_method: PaymentMethod::Credit,
            customer: Some(&customer),
            seller: &seller,
            crates_in: 0,
            crates_out: 0,
            due_date: Some(Utc::now()),
        })
        .await
        .unwrap();

    let settings = pos.settings().await.unwrap();
    let text = feira_pos::format_receipt(&sale, &settings);

    assert!(text.contains("4x Abacaxi Pérola"));
    assert!(text.contains("*Cliente:* Quitanda da Ana"));
    assert!(text.contains("*TOTAL: R$ 18,00*"));
    assert!(text.contains("FIADO"));
}
