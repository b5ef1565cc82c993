//! SeaORM implementation of InvoiceRepository
//!
//! Invoice creation and cancellation touch invoices, invoice_lines,
//! shipments, clients and ledger_entries in one database transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::ledger_repository::{post_balance, Posting};
use super::{conflict, db_err};
use crate::domain::invoice::{Invoice, InvoiceLine, InvoiceRepository, InvoiceStatus, NewInvoice};
use crate::domain::ledger::LedgerEntryKind;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{invoice, invoice_line, shipment};
use crate::shared::money::{from_db, to_db};

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn status_to_entity(s: InvoiceStatus) -> invoice::InvoiceStatus {
    match s {
        InvoiceStatus::Pending => invoice::InvoiceStatus::Pending,
        InvoiceStatus::PartiallyPaid => invoice::InvoiceStatus::PartiallyPaid,
        InvoiceStatus::Paid => invoice::InvoiceStatus::Paid,
        InvoiceStatus::Overdue => invoice::InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled => invoice::InvoiceStatus::Cancelled,
    }
}

fn status_to_domain(s: invoice::InvoiceStatus) -> InvoiceStatus {
    match s {
        invoice::InvoiceStatus::Pending => InvoiceStatus::Pending,
        invoice::InvoiceStatus::PartiallyPaid => InvoiceStatus::PartiallyPaid,
        invoice::InvoiceStatus::Paid => InvoiceStatus::Paid,
        invoice::InvoiceStatus::Overdue => InvoiceStatus::Overdue,
        invoice::InvoiceStatus::Cancelled => InvoiceStatus::Cancelled,
    }
}

fn line_to_domain(m: invoice_line::Model) -> DomainResult<InvoiceLine> {
    Ok(InvoiceLine {
        shipment_id: m.shipment_id,
        position: m.position,
        amount_ht: from_db("invoice_lines.amount_ht", &m.amount_ht)?,
    })
}

fn model_to_domain(m: invoice::Model, lines: Vec<InvoiceLine>) -> DomainResult<Invoice> {
    Ok(Invoice {
        id: m.id,
        invoice_number: m.invoice_number,
        client_id: m.client_id,
        lines,
        amount_ht: from_db("invoices.amount_ht", &m.amount_ht)?,
        tva_rate: from_db("invoices.tva_rate", &m.tva_rate)?,
        tva_amount: from_db("invoices.tva_amount", &m.tva_amount)?,
        total_ttc: from_db("invoices.total_ttc", &m.total_ttc)?,
        amount_paid: from_db("invoices.amount_paid", &m.amount_paid)?,
        amount_due: from_db("invoices.amount_due", &m.amount_due)?,
        status: status_to_domain(m.status),
        issue_date: m.issue_date,
        due_date: m.due_date,
        notes: m.notes,
        version: m.version,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

/// Attach lines to invoice rows, preserving row order
async fn with_lines<C: ConnectionTrait>(
    conn: &C,
    models: Vec<invoice::Model>,
) -> DomainResult<Vec<Invoice>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let line_models = invoice_line::Entity::find()
        .filter(invoice_line::Column::InvoiceId.is_in(ids))
        .order_by_asc(invoice_line::Column::InvoiceId)
        .order_by_asc(invoice_line::Column::Position)
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut grouped: HashMap<i32, Vec<InvoiceLine>> = HashMap::new();
    for line in line_models {
        let invoice_id = line.invoice_id;
        grouped
            .entry(invoice_id)
            .or_default()
            .push(line_to_domain(line)?);
    }

    models
        .into_iter()
        .map(|m| {
            let lines = grouped.remove(&m.id).unwrap_or_default();
            model_to_domain(m, lines)
        })
        .collect()
}

pub(super) async fn load_one<C: ConnectionTrait>(conn: &C, id: i32) -> DomainResult<Invoice> {
    let model = invoice::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Invoice", id))?;
    let mut invoices = with_lines(conn, vec![model]).await?;
    invoices
        .pop()
        .ok_or_else(|| DomainError::not_found("Invoice", id))
}

/// Compare-and-swap the mutable invoice columns against `invoice.version`
pub(super) async fn write_invoice_state<C: ConnectionTrait>(
    conn: &C,
    invoice: &Invoice,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let update = invoice::ActiveModel {
        amount_paid: Set(to_db(invoice.amount_paid)),
        amount_due: Set(to_db(invoice.amount_due)),
        status: Set(status_to_entity(invoice.status)),
        version: Set(invoice.version + 1),
        updated_at: Set(at),
        ..Default::default()
    };
    let result = invoice::Entity::update_many()
        .set(update)
        .filter(invoice::Column::Id.eq(invoice.id))
        .filter(invoice::Column::Version.eq(invoice.version))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected != 1 {
        return Err(conflict("Invoice", invoice.id));
    }
    Ok(())
}

// ── InvoiceRepository impl ──────────────────────────────────────

pub struct SeaOrmInvoiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmInvoiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceRepository for SeaOrmInvoiceRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Invoice>> {
        let model = invoice::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(model) = model else {
            return Ok(None);
        };
        Ok(with_lines(&self.db, vec![model]).await?.pop())
    }

    async fn find_by_client(&self, client_id: i32) -> DomainResult<Vec<Invoice>> {
        let models = invoice::Entity::find()
            .filter(invoice::Column::ClientId.eq(client_id))
            .order_by_desc(invoice::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        with_lines(&self.db, models).await
    }

    async fn find_all(&self, status: Option<InvoiceStatus>) -> DomainResult<Vec<Invoice>> {
        let mut query = invoice::Entity::find().order_by_desc(invoice::Column::Id);
        if let Some(status) = status {
            query = query.filter(invoice::Column::Status.eq(status_to_entity(status)));
        }
        let models = query.all(&self.db).await.map_err(db_err)?;
        with_lines(&self.db, models).await
    }

    async fn find_overdue_candidates(&self, now: DateTime<Utc>) -> DomainResult<Vec<Invoice>> {
        let models = invoice::Entity::find()
            .filter(invoice::Column::Status.is_in([
                invoice::InvoiceStatus::Pending,
                invoice::InvoiceStatus::PartiallyPaid,
            ]))
            .order_by_asc(invoice::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        // Date comparison stays in Rust; SQLite stores timestamps as text
        let due: Vec<invoice::Model> = models.into_iter().filter(|m| m.due_date < now).collect();
        with_lines(&self.db, due).await
    }

    async fn create(&self, new_invoice: NewInvoice) -> DomainResult<Invoice> {
        if new_invoice.lines.is_empty() {
            return Err(DomainError::Validation(
                "an invoice needs at least one shipment".to_string(),
            ));
        }
        let shipment_ids: Vec<i32> = new_invoice.lines.iter().map(|l| l.shipment_id).collect();
        let now = Utc::now();
        let totals = new_invoice.totals;

        let txn = self.db.begin().await.map_err(db_err)?;

        let inserted = invoice::ActiveModel {
            id: NotSet,
            invoice_number: Set(new_invoice.invoice_number),
            client_id: Set(new_invoice.client_id),
            amount_ht: Set(to_db(totals.amount_ht)),
            tva_rate: Set(to_db(totals.tva_rate)),
            tva_amount: Set(to_db(totals.tva_amount)),
            total_ttc: Set(to_db(totals.total_ttc)),
            amount_paid: Set(to_db(Decimal::ZERO)),
            amount_due: Set(to_db(totals.total_ttc)),
            status: Set(invoice::InvoiceStatus::Pending),
            issue_date: Set(new_invoice.issue_date),
            due_date: Set(new_invoice.due_date),
            notes: Set(new_invoice.notes),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        // Conditional claim: only rows still eligible are flipped
        let claimed = shipment::Entity::update_many()
            .col_expr(shipment::Column::IsInvoiced, Expr::value(true))
            .col_expr(shipment::Column::InvoiceId, Expr::value(inserted.id))
            .col_expr(
                shipment::Column::Version,
                Expr::col(shipment::Column::Version).add(1),
            )
            .col_expr(shipment::Column::UpdatedAt, Expr::value(now))
            .filter(shipment::Column::Id.is_in(shipment_ids.clone()))
            .filter(shipment::Column::ClientId.eq(new_invoice.client_id))
            .filter(shipment::Column::IsInvoiced.eq(false))
            .filter(shipment::Column::Status.is_in([
                shipment::ShipmentStatus::Delivered,
                shipment::ShipmentStatus::Returned,
            ]))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if claimed.rows_affected != shipment_ids.len() as u64 {
            // Dropping the transaction rolls the invoice row back
            return Err(DomainError::Conflict(format!(
                "claimed {} of {} shipments; another invoice took the rest",
                claimed.rows_affected,
                shipment_ids.len()
            )));
        }

        let lines = new_invoice
            .lines
            .iter()
            .map(|l| invoice_line::ActiveModel {
                id: NotSet,
                invoice_id: Set(inserted.id),
                shipment_id: Set(l.shipment_id),
                position: Set(l.position),
                amount_ht: Set(to_db(l.amount_ht)),
            });
        invoice_line::Entity::insert_many(lines)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let created = load_one(&txn, inserted.id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            invoice_id = created.id,
            invoice_number = %created.invoice_number,
            client_id = created.client_id,
            shipments = created.lines.len(),
            total_ttc = %created.total_ttc,
            "Invoice created"
        );
        Ok(created)
    }

    async fn cancel(&self, cancelled: &Invoice, refund: Decimal) -> DomainResult<Invoice> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        write_invoice_state(&txn, cancelled, now).await?;

        shipment::Entity::update_many()
            .col_expr(shipment::Column::IsInvoiced, Expr::value(false))
            .col_expr(shipment::Column::InvoiceId, Expr::value(Option::<i32>::None))
            .col_expr(
                shipment::Column::Version,
                Expr::col(shipment::Column::Version).add(1),
            )
            .col_expr(shipment::Column::UpdatedAt, Expr::value(now))
            .filter(shipment::Column::InvoiceId.eq(cancelled.id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if refund > Decimal::ZERO {
            post_balance(
                &txn,
                Posting {
                    client_id: cancelled.client_id,
                    invoice_id: cancelled.id,
                    payment_id: None,
                    kind: LedgerEntryKind::InvoiceCancelled,
                    delta: -refund,
                    at: now,
                },
            )
            .await?;
        }

        let stored = load_one(&txn, cancelled.id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            invoice_id = stored.id,
            client_id = stored.client_id,
            refund = %refund,
            "Invoice cancelled"
        );
        Ok(stored)
    }

    async fn update_status(&self, inv: &Invoice) -> DomainResult<Invoice> {
        let now = Utc::now();
        write_invoice_state(&self.db, inv, now).await?;
        load_one(&self.db, inv.id).await
    }
}
