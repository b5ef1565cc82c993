//! Payment ledger integration tests

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use freight_billing::application::{GenerateInvoice, RecordPayment};
use freight_billing::domain::invoice::{Invoice, InvoiceStatus};
use freight_billing::domain::ledger::LedgerEntryKind;
use freight_billing::domain::payment::PaymentMethod;
use freight_billing::domain::DomainError;
use freight_billing::shared::money::round2;

fn payment(invoice_id: i32, amount: Decimal) -> RecordPayment {
    RecordPayment {
        invoice_id,
        amount,
        method: PaymentMethod::BankTransfer,
        payment_date: None,
        reference: Some("VIR-001".to_string()),
        notes: None,
    }
}

/// Invoice for one delivered shipment priced at `amount_ht`
async fn invoice_for(app: &common::TestApp, client_id: i32, amount_ht: Decimal) -> Invoice {
    let s = app.delivered_shipment(client_id, amount_ht).await;
    app.services
        .invoices
        .generate_invoice(GenerateInvoice {
            client_id,
            shipment_ids: vec![s.id],
            due_in_days: None,
            notes: None,
        })
        .await
        .unwrap()
}

fn assert_due_consistent(invoice: &Invoice) {
    assert_eq!(
        invoice.amount_due,
        round2(invoice.total_ttc - invoice.amount_paid)
    );
}

#[tokio::test]
async fn full_payment_settles_invoice() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let a = app.delivered_shipment(client.id, dec!(100)).await;
    let b = app.delivered_shipment(client.id, dec!(50)).await;
    let invoice = app
        .services
        .invoices
        .generate_invoice(GenerateInvoice {
            client_id: client.id,
            shipment_ids: vec![a.id, b.id],
            due_in_days: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(invoice.total_ttc, dec!(178.50));

    let receipt = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(178.50)))
        .await
        .unwrap();
    assert_eq!(receipt.invoice.status, InvoiceStatus::Paid);
    assert_eq!(receipt.invoice.amount_due, dec!(0));
    assert_eq!(receipt.payment.amount, dec!(178.50));
    assert_eq!(receipt.payment.client_id, client.id);
    assert_due_consistent(&receipt.invoice);

    let client = app.services.clients.get_client(client.id).await.unwrap();
    assert_eq!(client.account_balance, dec!(178.50));

    let again = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(again, DomainError::InvoiceAlreadyPaid(_)));
}

#[tokio::test]
async fn partial_payment_then_overpayment_is_rejected() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    // 84.03 HT -> 15.97 TVA -> 100.00 TTC
    let invoice = invoice_for(&app, client.id, dec!(84.03)).await;
    assert_eq!(invoice.amount_due, dec!(100.00));

    let receipt = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(60)))
        .await
        .unwrap();
    assert_eq!(receipt.invoice.amount_due, dec!(40.00));
    assert_eq!(receipt.invoice.status, InvoiceStatus::PartiallyPaid);

    let err = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(50)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Overpayment { .. }));

    let unchanged = app.services.invoices.get_invoice(invoice.id).await.unwrap();
    assert_eq!(unchanged.amount_due, dec!(40.00));
    assert_eq!(unchanged.amount_paid, dec!(60));
    assert_eq!(
        app.services.payments.list_payments(invoice.id).await.unwrap().len(),
        1
    );
    let client = app.services.clients.get_client(client.id).await.unwrap();
    assert_eq!(client.account_balance, dec!(60));
}

#[tokio::test]
async fn invalid_amounts_are_rejected() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let invoice = invoice_for(&app, client.id, dec!(100)).await;

    for amount in [dec!(0), dec!(-5), dec!(10.001)] {
        let err = app
            .services
            .payments
            .record_payment(payment(invoice.id, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)), "{amount}");
    }

    let missing = app
        .services
        .payments
        .record_payment(payment(777, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(missing, DomainError::NotFound { entity: "Invoice", .. }));
}

#[tokio::test]
async fn cancel_with_refund_releases_shipments() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let invoice = invoice_for(&app, client.id, dec!(84.03)).await;
    app.services
        .payments
        .record_payment(payment(invoice.id, dec!(60)))
        .await
        .unwrap();

    let cancelled = app.services.invoices.cancel_invoice(invoice.id).await.unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);

    let client_after = app.services.clients.get_client(client.id).await.unwrap();
    assert_eq!(client_after.account_balance, dec!(0));

    for id in cancelled.shipment_ids() {
        let s = app.services.shipments.get_shipment(id).await.unwrap();
        assert!(!s.is_invoiced);
        assert_eq!(s.invoice_id, None);
    }

    // Payment rows survive an invoice cancellation
    assert_eq!(
        app.services.payments.list_payments(invoice.id).await.unwrap().len(),
        1
    );

    let err = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvoiceCancelled(_)));

    let twice = app.services.invoices.cancel_invoice(invoice.id).await.unwrap_err();
    assert!(matches!(twice, DomainError::InvoiceCancelled(_)));
}

#[tokio::test]
async fn paid_invoice_cannot_be_cancelled() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let invoice = invoice_for(&app, client.id, dec!(84.03)).await;
    app.services
        .payments
        .record_payment(payment(invoice.id, dec!(100)))
        .await
        .unwrap();

    let err = app.services.invoices.cancel_invoice(invoice.id).await.unwrap_err();
    assert!(matches!(err, DomainError::CannotCancelPaidInvoice(_)));
}

#[tokio::test]
async fn cancel_payment_restores_invoice_and_balance() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let invoice = invoice_for(&app, client.id, dec!(84.03)).await;

    let first = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(60)))
        .await
        .unwrap();
    let second = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(40)))
        .await
        .unwrap();
    assert_eq!(second.invoice.status, InvoiceStatus::Paid);

    let after_second = app
        .services
        .payments
        .cancel_payment(second.payment.id)
        .await
        .unwrap();
    assert_eq!(after_second.status, InvoiceStatus::PartiallyPaid);
    assert_eq!(after_second.amount_due, dec!(40.00));
    assert_due_consistent(&after_second);

    let after_first = app
        .services
        .payments
        .cancel_payment(first.payment.id)
        .await
        .unwrap();
    assert_eq!(after_first.status, InvoiceStatus::Pending);
    assert_eq!(after_first.amount_paid, dec!(0));
    assert_eq!(after_first.amount_due, dec!(100.00));

    assert!(app
        .services
        .payments
        .list_payments(invoice.id)
        .await
        .unwrap()
        .is_empty());
    let client = app.services.clients.get_client(client.id).await.unwrap();
    assert_eq!(client.account_balance, dec!(0));

    let gone = app
        .services
        .payments
        .cancel_payment(first.payment.id)
        .await
        .unwrap_err();
    assert!(matches!(gone, DomainError::NotFound { entity: "Payment", .. }));
}

#[tokio::test]
async fn ledger_journals_every_balance_movement() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let invoice = invoice_for(&app, client.id, dec!(84.03)).await;

    let p1 = app
        .services
        .payments
        .record_payment(payment(invoice.id, dec!(30)))
        .await
        .unwrap();
    app.services
        .payments
        .record_payment(payment(invoice.id, dec!(30)))
        .await
        .unwrap();
    app.services
        .payments
        .cancel_payment(p1.payment.id)
        .await
        .unwrap();
    app.services.invoices.cancel_invoice(invoice.id).await.unwrap();

    let entries = app.services.payments.client_ledger(client.id).await.unwrap();
    let kinds: Vec<LedgerEntryKind> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LedgerEntryKind::PaymentRecorded,
            LedgerEntryKind::PaymentRecorded,
            LedgerEntryKind::PaymentReversed,
            LedgerEntryKind::InvoiceCancelled,
        ]
    );
    let amounts: Vec<Decimal> = entries.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![dec!(30), dec!(30), dec!(-30), dec!(-30)]);
    let balances: Vec<Decimal> = entries.iter().map(|e| e.balance_after).collect();
    assert_eq!(balances, vec![dec!(30), dec!(60), dec!(30), dec!(0)]);
    assert_eq!(entries[2].payment_id, Some(p1.payment.id));

    let client = app.services.clients.get_client(client.id).await.unwrap();
    assert_eq!(client.account_balance, dec!(0));
}

#[tokio::test]
async fn balance_summary_counts_outstanding_invoices() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let paid = invoice_for(&app, client.id, dec!(84.03)).await;
    let partial = invoice_for(&app, client.id, dec!(84.03)).await;
    let _open = invoice_for(&app, client.id, dec!(50)).await;

    app.services
        .payments
        .record_payment(payment(paid.id, dec!(100)))
        .await
        .unwrap();
    app.services
        .payments
        .record_payment(payment(partial.id, dec!(25)))
        .await
        .unwrap();

    let summary = app
        .services
        .payments
        .client_balance_summary(client.id)
        .await
        .unwrap();
    assert_eq!(summary.account_balance, dec!(125));
    assert_eq!(summary.pending_invoices_count, 2);
    // 75.00 left on the partial invoice + 59.50 on the open one
    assert_eq!(summary.total_pending, dec!(134.50));
}

#[tokio::test]
async fn concurrent_payments_never_overpay() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let invoice = invoice_for(&app, client.id, dec!(84.03)).await;

    let (a, b) = tokio::join!(
        app.services
            .payments
            .record_payment(payment(invoice.id, dec!(70))),
        app.services
            .payments
            .record_payment(payment(invoice.id, dec!(70))),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);

    let settled = app.services.invoices.get_invoice(invoice.id).await.unwrap();
    assert_eq!(settled.amount_paid, dec!(70));
    assert_eq!(settled.amount_due, dec!(30.00));
    assert_due_consistent(&settled);
}
