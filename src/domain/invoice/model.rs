//! Invoice domain entity and lifecycle
//!
//! ```text
//! PENDING ────────┬─ partial payment ─▶ PARTIALLY_PAID ─ rest ─▶ PAID
//!    │            └─ full payment ──────────────────────────────▶ PAID
//!    ├─ due date passed ─▶ OVERDUE (also from PARTIALLY_PAID)
//!    └─ cancel ─▶ CANCELLED (also from PARTIALLY_PAID and OVERDUE)
//! ```
//!
//! PAID and CANCELLED are terminal with respect to payments. Reversing a
//! payment can move PAID back to PARTIALLY_PAID or PENDING.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;
use crate::shared::money::round2;

/// Algerian standard VAT rate, 19%
pub const TVA_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceStatus {
    Pending,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::PartiallyPaid => "PARTIALLY_PAID",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PARTIALLY_PAID" => Some(Self::PartiallyPaid),
            "PAID" => Some(Self::Paid),
            "OVERDUE" => Some(Self::Overdue),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Counts towards a client's outstanding total
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Pending | Self::PartiallyPaid | Self::Overdue)
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invoiced shipment, with its tax-exclusive amount at invoicing time
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub shipment_id: i32,
    pub position: i32,
    pub amount_ht: Decimal,
}

/// Tax totals derived from the tax-exclusive amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub amount_ht: Decimal,
    pub tva_rate: Decimal,
    pub tva_amount: Decimal,
    pub total_ttc: Decimal,
}

impl InvoiceTotals {
    pub fn compute(amount_ht: Decimal, tva_rate: Decimal) -> DomainResult<Self> {
        let amount_ht = round2(amount_ht);
        let tva_amount = amount_ht
            .checked_mul(tva_rate)
            .map(round2)
            .ok_or_else(|| out_of_range("tva_amount"))?;
        let total_ttc = amount_ht
            .checked_add(tva_amount)
            .map(round2)
            .ok_or_else(|| out_of_range("total_ttc"))?;
        Ok(Self {
            amount_ht,
            tva_rate,
            tva_amount,
            total_ttc,
        })
    }
}

fn out_of_range(field: &str) -> DomainError {
    DomainError::Validation(format!("{} out of range", field))
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: i32,
    pub invoice_number: String,
    pub client_id: i32,
    pub lines: Vec<InvoiceLine>,
    pub amount_ht: Decimal,
    pub tva_rate: Decimal,
    pub tva_amount: Decimal,
    pub total_ttc: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub status: InvoiceStatus,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn shipment_ids(&self) -> Vec<i32> {
        self.lines.iter().map(|l| l.shipment_id).collect()
    }

    /// Validate and apply a payment. On error the invoice is unchanged.
    pub fn apply_payment(&mut self, amount: Decimal) -> DomainResult<()> {
        match self.status {
            InvoiceStatus::Cancelled => return Err(DomainError::InvoiceCancelled(self.id)),
            InvoiceStatus::Paid => return Err(DomainError::InvoiceAlreadyPaid(self.id)),
            _ => {}
        }
        if amount <= Decimal::ZERO || amount.normalize().scale() > 2 {
            return Err(DomainError::InvalidAmount(amount));
        }
        if amount > self.amount_due {
            return Err(DomainError::Overpayment {
                amount,
                amount_due: self.amount_due,
            });
        }

        self.amount_paid = round2(self.amount_paid + amount);
        self.amount_due = round2(self.total_ttc - self.amount_paid);
        if self.amount_due <= Decimal::ZERO {
            self.amount_due = Decimal::ZERO;
            self.status = InvoiceStatus::Paid;
        } else {
            self.status = InvoiceStatus::PartiallyPaid;
        }
        Ok(())
    }

    /// Undo a previously applied payment
    pub fn reverse_payment(&mut self, amount: Decimal) -> DomainResult<()> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(DomainError::InvoiceCancelled(self.id));
        }
        self.amount_paid = round2(self.amount_paid - amount);
        if self.amount_paid <= Decimal::ZERO {
            self.amount_paid = Decimal::ZERO;
            self.status = InvoiceStatus::Pending;
        } else {
            self.status = InvoiceStatus::PartiallyPaid;
        }
        self.amount_due = round2(self.total_ttc - self.amount_paid);
        Ok(())
    }

    /// Cancel the invoice, returning the amount to refund to the client.
    pub fn cancel(&mut self) -> DomainResult<Decimal> {
        match self.status {
            InvoiceStatus::Paid => Err(DomainError::CannotCancelPaidInvoice(self.id)),
            InvoiceStatus::Cancelled => Err(DomainError::InvoiceCancelled(self.id)),
            _ => {
                self.status = InvoiceStatus::Cancelled;
                Ok(self.amount_paid)
            }
        }
    }

    /// Flag the invoice overdue if its due date has passed. Returns whether
    /// the status changed.
    pub fn check_overdue(&mut self, now: DateTime<Utc>) -> bool {
        let open = matches!(
            self.status,
            InvoiceStatus::Pending | InvoiceStatus::PartiallyPaid
        );
        if open && self.due_date < now {
            self.status = InvoiceStatus::Overdue;
            true
        } else {
            false
        }
    }
}

/// Invoice ready to persist, built from eligible shipments
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub client_id: i32,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewInvoice {
    /// `shipments` holds `(shipment_id, amount_ht)` in caller order.
    pub fn draft(
        client_id: i32,
        shipments: &[(i32, Decimal)],
        issue_date: DateTime<Utc>,
        due_in_days: i64,
        notes: Option<String>,
    ) -> DomainResult<Self> {
        let lines: Vec<InvoiceLine> = shipments
            .iter()
            .enumerate()
            .map(|(i, (shipment_id, amount))| InvoiceLine {
                shipment_id: *shipment_id,
                position: i as i32 + 1,
                amount_ht: *amount,
            })
            .collect();
        let amount_ht = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.amount_ht))
            .ok_or_else(|| out_of_range("amount_ht"))?;
        let due_date = Duration::try_days(due_in_days)
            .and_then(|term| issue_date.checked_add_signed(term))
            .ok_or_else(|| out_of_range("due_in_days"))?;

        Ok(Self {
            invoice_number: generate_invoice_number(issue_date),
            client_id,
            lines,
            totals: InvoiceTotals::compute(amount_ht, TVA_RATE)?,
            issue_date,
            due_date,
            notes,
        })
    }
}

/// `INV-YYYYMMDD-XXXXXXXX`, unique per invoice
pub fn generate_invoice_number(issue_date: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "INV-{}-{}",
        issue_date.format("%Y%m%d"),
        suffix[..8].to_ascii_uppercase()
    )
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn invoice(total_ht: Decimal) -> Invoice {
        let issued = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let draft = NewInvoice::draft(1, &[(1, total_ht)], issued, 30, None).unwrap();
        Invoice {
            id: 1,
            invoice_number: draft.invoice_number,
            client_id: 1,
            lines: draft.lines,
            amount_ht: draft.totals.amount_ht,
            tva_rate: draft.totals.tva_rate,
            tva_amount: draft.totals.tva_amount,
            total_ttc: draft.totals.total_ttc,
            amount_paid: Decimal::ZERO,
            amount_due: draft.totals.total_ttc,
            status: InvoiceStatus::Pending,
            issue_date: draft.issue_date,
            due_date: draft.due_date,
            notes: None,
            version: 1,
            created_at: issued,
            updated_at: issued,
        }
    }

    #[test]
    fn totals_apply_tva() {
        let t = InvoiceTotals::compute(dec!(150), TVA_RATE).unwrap();
        assert_eq!(t.tva_amount, dec!(28.50));
        assert_eq!(t.total_ttc, dec!(178.50));
        assert_eq!(TVA_RATE, dec!(0.19));
    }

    #[test]
    fn draft_numbers_lines_and_due_date() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let d = NewInvoice::draft(4, &[(10, dec!(100)), (11, dec!(50))], issued, 30, None).unwrap();
        assert_eq!(d.lines.len(), 2);
        assert_eq!(d.lines[1].position, 2);
        assert_eq!(d.totals.amount_ht, dec!(150));
        assert_eq!(d.due_date, issued + Duration::days(30));
        assert!(d.invoice_number.starts_with("INV-20240305-"));
        assert_eq!(d.invoice_number.len(), "INV-20240305-".len() + 8);
    }

    #[test]
    fn draft_rejects_unrepresentable_due_date_and_totals() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let far = NewInvoice::draft(4, &[(10, dec!(100))], issued, 1_000_000_000, None);
        assert!(matches!(far, Err(DomainError::Validation(_))));

        let huge = NewInvoice::draft(4, &[(10, Decimal::MAX), (11, Decimal::MAX)], issued, 30, None);
        assert!(matches!(huge, Err(DomainError::Validation(_))));
    }

    #[test]
    fn full_payment_marks_paid() {
        let mut inv = invoice(dec!(150));
        inv.apply_payment(dec!(178.50)).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert_eq!(inv.amount_due, Decimal::ZERO);
    }

    #[test]
    fn partial_then_overpay_leaves_invoice_unchanged() {
        let mut inv = invoice(dec!(84.03)); // ttc 100.00
        assert_eq!(inv.total_ttc, dec!(100.00));
        inv.apply_payment(dec!(60)).unwrap();
        assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(inv.amount_due, dec!(40.00));

        let err = inv.apply_payment(dec!(50)).unwrap_err();
        assert!(matches!(err, DomainError::Overpayment { .. }));
        assert_eq!(inv.amount_due, dec!(40.00));
        assert_eq!(inv.amount_paid, dec!(60));
    }

    #[test]
    fn rejects_bad_amounts_and_terminal_states() {
        let mut inv = invoice(dec!(100));
        assert!(matches!(inv.apply_payment(dec!(0)), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(inv.apply_payment(dec!(-5)), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(inv.apply_payment(dec!(1.005)), Err(DomainError::InvalidAmount(_))));

        inv.apply_payment(inv.amount_due).unwrap();
        assert!(matches!(inv.apply_payment(dec!(1)), Err(DomainError::InvoiceAlreadyPaid(1))));

        let mut cancelled = invoice(dec!(100));
        cancelled.cancel().unwrap();
        assert!(matches!(cancelled.apply_payment(dec!(1)), Err(DomainError::InvoiceCancelled(1))));
    }

    #[test]
    fn reversal_restores_status() {
        let mut inv = invoice(dec!(150));
        inv.apply_payment(dec!(178.50)).unwrap();
        inv.reverse_payment(dec!(78.50)).unwrap();
        assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(inv.amount_due, dec!(78.50));
        inv.reverse_payment(dec!(100)).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Pending);
        assert_eq!(inv.amount_paid, Decimal::ZERO);
        assert_eq!(inv.amount_due, inv.total_ttc);
    }

    #[test]
    fn cancel_returns_refund_and_guards_paid() {
        let mut inv = invoice(dec!(84.03));
        inv.apply_payment(dec!(60)).unwrap();
        assert_eq!(inv.cancel().unwrap(), dec!(60));
        assert_eq!(inv.status, InvoiceStatus::Cancelled);
        assert!(matches!(inv.cancel(), Err(DomainError::InvoiceCancelled(_))));

        let mut paid = invoice(dec!(10));
        paid.apply_payment(paid.amount_due).unwrap();
        assert!(matches!(paid.cancel(), Err(DomainError::CannotCancelPaidInvoice(_))));
    }

    #[test]
    fn overdue_check_is_idempotent() {
        let mut inv = invoice(dec!(100));
        let later = inv.due_date + Duration::days(1);
        assert!(!inv.check_overdue(inv.due_date));
        assert!(inv.check_overdue(later));
        assert_eq!(inv.status, InvoiceStatus::Overdue);
        assert!(!inv.check_overdue(later));
        assert_eq!(inv.status, InvoiceStatus::Overdue);
    }

    #[test]
    fn overdue_invoice_still_accepts_payment() {
        let mut inv = invoice(dec!(100));
        inv.check_overdue(inv.due_date + Duration::days(2));
        inv.apply_payment(inv.amount_due).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }
}
