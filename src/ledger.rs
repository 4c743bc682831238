// Append-only payment ledger.
//
// Balances are always recomputed from the full payment history, never
// incremented in place, so a reload that races a submission can only ever
// land on a value derived from some complete payment list.

use chrono::Utc;
use thiserror::Error;

use crate::model::{Payment, PaymentKind, PaymentMethod, Reservation};
use crate::money::round_half_up;

#[derive(Error, Debug, PartialEq)]
pub enum LedgerError {
    #[error("invalid payment amount {amount:.2}: must be greater than zero")]
    InvalidAmount { amount: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSummary {
    pub paid: f64,
    pub pending: f64,
}

/// Payments recorded against one reservation, ordered by receipt time.
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    reservation_id: String,
    payments: Vec<Payment>,
    next_seq: u64,
}

impl PaymentLedger {
    pub fn new(reservation_id: impl Into<String>) -> Self {
        Self {
            reservation_id: reservation_id.into(),
            payments: Vec::new(),
            next_seq: 1,
        }
    }

    /// Rebuild a ledger from payments fetched elsewhere (e.g. the remote
    /// backend). Sorted by timestamp so listing order is stable regardless
    /// of the order the server returned them in.
    pub fn from_payments(reservation_id: impl Into<String>, mut payments: Vec<Payment>) -> Self {
        payments.sort_by_key(|p| p.received_at);
        let next_seq = payments.len() as u64 + 1;
        Self {
            reservation_id: reservation_id.into(),
            payments,
            next_seq,
        }
    }

    pub fn add_payment(
        &mut self,
        amount: f64,
        method: PaymentMethod,
        kind: PaymentKind,
        reference: Option<String>,
        notes: Option<String>,
    ) -> Result<&Payment, LedgerError> {
        if amount <= 0.0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        let payment = Payment {
            id: format!("{}-p{}", self.reservation_id, self.next_seq),
            reservation_id: self.reservation_id.clone(),
            amount,
            method,
            kind,
            reference,
            notes,
            received_at: Utc::now(),
        };
        self.next_seq += 1;
        self.payments.push(payment);
        Ok(self.payments.last().unwrap())
    }

    /// Payments ordered by timestamp ascending.
    pub fn list_payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Full recompute over the payment history: non-refund kinds add,
    /// refunds subtract, pending never goes below zero. Idempotent.
    pub fn balance(&self, total: f64) -> BalanceSummary {
        balance_of(total, &self.payments)
    }

    /// Write the recomputed paid/pending figures back onto the reservation.
    pub fn apply_to(&self, reservation: &mut Reservation) {
        let summary = self.balance(reservation.total);
        reservation.paid_amount = summary.paid;
        reservation.pending_balance = summary.pending;
    }
}

/// Balance derivation usable on any payment snapshot, not just a ledger the
/// caller owns. The detail view recomputes from the latest fetched list so
/// a stale reload cannot overwrite a newer balance.
pub fn balance_of(total: f64, payments: &[Payment]) -> BalanceSummary {
    let paid: f64 = payments
        .iter()
        .map(|p| match p.kind {
            PaymentKind::Refund => -p.amount,
            _ => p.amount,
        })
        .sum();
    let paid = round_half_up(paid, 2);
    BalanceSummary {
        paid,
        pending: round_half_up((total - paid).max(0.0), 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0)]
    #[test_case(-1.0)]
    #[test_case(-2176.0)]
    fn rejects_non_positive_amounts(amount: f64) {
        let mut ledger = PaymentLedger::new("res-1");
        assert_eq!(
            ledger
                .add_payment(amount, PaymentMethod::Cash, PaymentKind::Deposit, None, None)
                .unwrap_err(),
            LedgerError::InvalidAmount { amount }
        );
        assert!(ledger.list_payments().is_empty());
    }

    #[test]
    fn accumulates_payments_toward_the_total() {
        let mut ledger = PaymentLedger::new("res-1");
        ledger
            .add_payment(2000.0, PaymentMethod::Card, PaymentKind::Installment, None, None)
            .unwrap();

        let summary = ledger.balance(4176.0);
        assert_eq!(summary.paid, 2000.0);
        assert_eq!(summary.pending, 2176.0);

        ledger
            .add_payment(2176.0, PaymentMethod::Card, PaymentKind::Settlement, None, None)
            .unwrap();
        let summary = ledger.balance(4176.0);
        assert_eq!(summary.paid, 4176.0);
        assert_eq!(summary.pending, 0.0);
    }

    #[test]
    fn refunds_reduce_the_paid_amount() {
        let mut ledger = PaymentLedger::new("res-1");
        ledger
            .add_payment(3000.0, PaymentMethod::Transfer, PaymentKind::Deposit, None, None)
            .unwrap();
        ledger
            .add_payment(500.0, PaymentMethod::Transfer, PaymentKind::Refund, None, None)
            .unwrap();

        let summary = ledger.balance(4176.0);
        assert_eq!(summary.paid, 2500.0);
        assert_eq!(summary.pending, 1676.0);
    }

    #[test]
    fn overpayment_never_yields_a_negative_pending_balance() {
        let mut ledger = PaymentLedger::new("res-1");
        ledger
            .add_payment(5000.0, PaymentMethod::Cash, PaymentKind::Settlement, None, None)
            .unwrap();
        let summary = ledger.balance(4176.0);
        assert_eq!(summary.paid, 5000.0);
        assert_eq!(summary.pending, 0.0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut ledger = PaymentLedger::new("res-1");
        for amount in [1000.0, 750.5, 99.99] {
            ledger
                .add_payment(amount, PaymentMethod::Card, PaymentKind::Installment, None, None)
                .unwrap();
        }
        let first = ledger.balance(4176.0);
        let second = ledger.balance(4176.0);
        assert_eq!(first, second);
    }

    #[test]
    fn listing_preserves_timestamp_order_after_rebuild() {
        let mut ledger = PaymentLedger::new("res-1");
        ledger
            .add_payment(100.0, PaymentMethod::Cash, PaymentKind::Deposit, None, None)
            .unwrap();
        ledger
            .add_payment(200.0, PaymentMethod::Card, PaymentKind::Installment, None, None)
            .unwrap();

        // Server returned them newest first; rebuilding restores order.
        let mut shuffled: Vec<Payment> = ledger.list_payments().to_vec();
        shuffled.reverse();
        let rebuilt = PaymentLedger::from_payments("res-1", shuffled);
        let amounts: Vec<f64> = rebuilt.list_payments().iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![100.0, 200.0]);
    }

    #[test]
    fn apply_to_writes_derived_figures_only() {
        let mut reservation = crate::model::Reservation {
            id: "res-1".to_string(),
            number: "R-0001".to_string(),
            client_id: "c1".to_string(),
            room_id: None,
            room_type_id: "rt1".to_string(),
            check_in: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            check_out: chrono::NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            adults: 2,
            children: 0,
            nightly_rate: 1200.0,
            subtotal: 3600.0,
            tax: 576.0,
            total: 4176.0,
            paid_amount: 0.0,
            pending_balance: 4176.0,
            state: crate::model::ReservationState::Confirmed,
            special_requests: None,
            created_at: Utc::now(),
        };
        let mut ledger = PaymentLedger::new("res-1");
        ledger
            .add_payment(2000.0, PaymentMethod::Card, PaymentKind::Installment, None, None)
            .unwrap();
        ledger.apply_to(&mut reservation);
        assert_eq!(reservation.paid_amount, 2000.0);
        assert_eq!(reservation.pending_balance, 2176.0);
    }
}
