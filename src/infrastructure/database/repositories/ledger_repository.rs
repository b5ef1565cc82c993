//! SeaORM implementation of LedgerRepository, plus the balance posting
//! routine shared by the invoice and payment units of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::{conflict, db_err};
use crate::domain::ledger::{LedgerEntry, LedgerEntryKind, LedgerRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{client, ledger_entry};
use crate::shared::money::{from_db, round2, to_db};

fn kind_to_entity(kind: LedgerEntryKind) -> ledger_entry::LedgerEntryKind {
    match kind {
        LedgerEntryKind::PaymentRecorded => ledger_entry::LedgerEntryKind::PaymentRecorded,
        LedgerEntryKind::PaymentReversed => ledger_entry::LedgerEntryKind::PaymentReversed,
        LedgerEntryKind::InvoiceCancelled => ledger_entry::LedgerEntryKind::InvoiceCancelled,
    }
}

fn kind_to_domain(kind: ledger_entry::LedgerEntryKind) -> LedgerEntryKind {
    match kind {
        ledger_entry::LedgerEntryKind::PaymentRecorded => LedgerEntryKind::PaymentRecorded,
        ledger_entry::LedgerEntryKind::PaymentReversed => LedgerEntryKind::PaymentReversed,
        ledger_entry::LedgerEntryKind::InvoiceCancelled => LedgerEntryKind::InvoiceCancelled,
    }
}

fn entry_to_domain(m: ledger_entry::Model) -> DomainResult<LedgerEntry> {
    Ok(LedgerEntry {
        id: m.id,
        client_id: m.client_id,
        invoice_id: m.invoice_id,
        payment_id: m.payment_id,
        kind: kind_to_domain(m.kind),
        amount: from_db("ledger_entries.amount", &m.amount)?,
        balance_after: from_db("ledger_entries.balance_after", &m.balance_after)?,
        created_at: m.created_at,
    })
}

/// One balance movement to post
pub(super) struct Posting {
    pub client_id: i32,
    pub invoice_id: i32,
    pub payment_id: Option<i32>,
    pub kind: LedgerEntryKind,
    /// Signed: positive credits the client
    pub delta: Decimal,
    pub at: DateTime<Utc>,
}

/// Move the client's balance by `posting.delta` (compare-and-swap on the
/// client version) and journal the movement. Must run on the caller's
/// transaction. Returns the new balance.
pub(super) async fn post_balance<C: ConnectionTrait>(
    conn: &C,
    posting: Posting,
) -> DomainResult<Decimal> {
    let current = client::Entity::find_by_id(posting.client_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Client", posting.client_id))?;

    let balance = from_db("clients.account_balance", &current.account_balance)?;
    let new_balance = round2(balance + posting.delta);

    let update = client::ActiveModel {
        account_balance: Set(to_db(new_balance)),
        version: Set(current.version + 1),
        updated_at: Set(posting.at),
        ..Default::default()
    };
    let result = client::Entity::update_many()
        .set(update)
        .filter(client::Column::Id.eq(posting.client_id))
        .filter(client::Column::Version.eq(current.version))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected != 1 {
        return Err(conflict("Client", posting.client_id));
    }

    let entry = ledger_entry::ActiveModel {
        id: NotSet,
        client_id: Set(posting.client_id),
        invoice_id: Set(posting.invoice_id),
        payment_id: Set(posting.payment_id),
        kind: Set(kind_to_entity(posting.kind)),
        amount: Set(to_db(posting.delta)),
        balance_after: Set(to_db(new_balance)),
        created_at: Set(posting.at),
    };
    entry.insert(conn).await.map_err(db_err)?;

    debug!(
        client_id = posting.client_id,
        invoice_id = posting.invoice_id,
        kind = posting.kind.as_str(),
        delta = %posting.delta,
        balance = %new_balance,
        "Balance posted"
    );
    Ok(new_balance)
}

pub struct SeaOrmLedgerRepository {
    db: DatabaseConnection,
}

impl SeaOrmLedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerRepository for SeaOrmLedgerRepository {
    async fn find_by_client(&self, client_id: i32) -> DomainResult<Vec<LedgerEntry>> {
        let models = ledger_entry::Entity::find()
            .filter(ledger_entry::Column::ClientId.eq(client_id))
            .order_by_asc(ledger_entry::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entry_to_domain).collect()
    }

    async fn find_by_invoice(&self, invoice_id: i32) -> DomainResult<Vec<LedgerEntry>> {
        let models = ledger_entry::Entity::find()
            .filter(ledger_entry::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(ledger_entry::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entry_to_domain).collect()
    }
}
