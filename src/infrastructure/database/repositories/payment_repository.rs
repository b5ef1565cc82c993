//! SeaORM implementation of PaymentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::invoice_repository::{load_one, write_invoice_state};
use super::ledger_repository::{post_balance, Posting};
use super::{conflict, db_err};
use crate::domain::invoice::Invoice;
use crate::domain::ledger::LedgerEntryKind;
use crate::domain::payment::{NewPayment, Payment, PaymentMethod, PaymentRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::payment;
use crate::shared::money::{from_db, to_db};

// ── Conversion helpers ──────────────────────────────────────────

fn method_to_entity(m: PaymentMethod) -> payment::PaymentMethod {
    match m {
        PaymentMethod::Cash => payment::PaymentMethod::Cash,
        PaymentMethod::Check => payment::PaymentMethod::Check,
        PaymentMethod::BankTransfer => payment::PaymentMethod::BankTransfer,
        PaymentMethod::Card => payment::PaymentMethod::Card,
        PaymentMethod::Other => payment::PaymentMethod::Other,
    }
}

fn method_to_domain(m: payment::PaymentMethod) -> PaymentMethod {
    match m {
        payment::PaymentMethod::Cash => PaymentMethod::Cash,
        payment::PaymentMethod::Check => PaymentMethod::Check,
        payment::PaymentMethod::BankTransfer => PaymentMethod::BankTransfer,
        payment::PaymentMethod::Card => PaymentMethod::Card,
        payment::PaymentMethod::Other => PaymentMethod::Other,
    }
}

fn model_to_domain(m: payment::Model) -> DomainResult<Payment> {
    Ok(Payment {
        id: m.id,
        invoice_id: m.invoice_id,
        client_id: m.client_id,
        amount: from_db("payments.amount", &m.amount)?,
        method: method_to_domain(m.method),
        payment_date: m.payment_date,
        reference: m.reference,
        notes: m.notes,
        created_at: m.created_at,
    })
}

// ── PaymentRepository impl ──────────────────────────────────────

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_invoice(&self, invoice_id: i32) -> DomainResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .filter(payment::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn record(
        &self,
        new_payment: NewPayment,
        paid: &Invoice,
    ) -> DomainResult<(Payment, Invoice)> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        write_invoice_state(&txn, paid, now).await?;

        let amount = new_payment.amount;
        let inserted = payment::ActiveModel {
            id: NotSet,
            invoice_id: Set(new_payment.invoice_id),
            client_id: Set(new_payment.client_id),
            amount: Set(to_db(amount)),
            method: Set(method_to_entity(new_payment.method)),
            payment_date: Set(new_payment.payment_date),
            reference: Set(new_payment.reference),
            notes: Set(new_payment.notes),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        post_balance(
            &txn,
            Posting {
                client_id: new_payment.client_id,
                invoice_id: new_payment.invoice_id,
                payment_id: Some(inserted.id),
                kind: LedgerEntryKind::PaymentRecorded,
                delta: amount,
                at: now,
            },
        )
        .await?;

        let stored = load_one(&txn, paid.id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            payment_id = inserted.id,
            invoice_id = stored.id,
            amount = %amount,
            status = %stored.status,
            "Payment recorded"
        );
        Ok((model_to_domain(inserted)?, stored))
    }

    async fn reverse(&self, p: &Payment, reverted: &Invoice) -> DomainResult<Invoice> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        write_invoice_state(&txn, reverted, now).await?;

        let deleted = payment::Entity::delete_by_id(p.id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if deleted.rows_affected != 1 {
            return Err(conflict("Payment", p.id));
        }

        post_balance(
            &txn,
            Posting {
                client_id: p.client_id,
                invoice_id: p.invoice_id,
                payment_id: Some(p.id),
                kind: LedgerEntryKind::PaymentReversed,
                delta: -p.amount,
                at: now,
            },
        )
        .await?;

        let stored = load_one(&txn, reverted.id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            payment_id = p.id,
            invoice_id = stored.id,
            amount = %p.amount,
            status = %stored.status,
            "Payment reversed"
        );
        Ok(stored)
    }
}
