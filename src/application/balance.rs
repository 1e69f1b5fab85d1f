//! Balance calculation
//!
//! Pure functions over minor currency units. The outstanding balance is what
//! the customer still owes toward the service itself; gateway processing
//! fees are computed separately and only ever added to the amount charged
//! through the gateway.

use crate::domain::payment::Payment;

/// Price quoted for a booking: the variant's base price plus the assigned
/// stylist's modifier (zero when unassigned).
pub fn quoted_price(variant_price_minor: i64, stylist_modifier_minor: i64) -> i64 {
    variant_price_minor + stylist_modifier_minor
}

/// Outstanding balance for a booking.
///
/// The deposit is owed on top of the service price, and every succeeded
/// payment (the deposit capture included) counts against the total. Never
/// negative.
pub fn outstanding_balance(price_minor: i64, deposit_minor: i64, payments: &[Payment]) -> i64 {
    let paid = paid_total(payments);
    (price_minor + deposit_minor - paid).max(0)
}

/// Sum of succeeded payment amounts.
pub fn paid_total(payments: &[Payment]) -> i64 {
    payments
        .iter()
        .filter(|p| p.is_succeeded())
        .map(|p| p.amount_minor)
        .sum()
}

/// Gateway processing fee for a charge of `amount_minor`.
///
/// `percent_bps` is in basis points (290 = 2.9%); the fixed part is added on
/// top. Rounds down, matching how processors quote fees in minor units.
pub fn processing_fee(amount_minor: i64, percent_bps: i64, fixed_minor: i64) -> i64 {
    amount_minor * percent_bps / 10_000 + fixed_minor
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn succeeded(amount: i64) -> Payment {
        Payment::captured("bk-1", amount, "pi_x")
    }

    #[test]
    fn outstanding_with_deposit_only() {
        // $80 service, $50 deposit, deposit captured → $80 still owed
        let payments = vec![succeeded(5_000)];
        assert_eq!(outstanding_balance(8_000, 5_000, &payments), 8_000);
    }

    #[test]
    fn outstanding_reaches_zero() {
        let payments = vec![succeeded(5_000), succeeded(8_000)];
        assert_eq!(outstanding_balance(8_000, 5_000, &payments), 0);
    }

    #[test]
    fn outstanding_never_negative() {
        let payments = vec![succeeded(5_000), succeeded(20_000)];
        assert_eq!(outstanding_balance(8_000, 5_000, &payments), 0);
    }

    #[test]
    fn outstanding_is_monotonically_non_increasing() {
        let mut payments = Vec::new();
        let mut last = outstanding_balance(8_000, 5_000, &payments);
        for amount in [2_000, 3_000, 4_000, 4_000] {
            payments.push(succeeded(amount));
            let next = outstanding_balance(8_000, 5_000, &payments);
            assert!(next <= last);
            assert!(next >= 0);
            last = next;
        }
    }

    #[test]
    fn failed_payments_do_not_count() {
        let mut failed = succeeded(8_000);
        failed.status = crate::domain::payment::PaymentStatus::Failed;
        let payments = vec![succeeded(5_000), failed];
        assert_eq!(outstanding_balance(8_000, 5_000, &payments), 8_000);
    }

    #[test]
    fn quoted_price_includes_stylist_modifier() {
        assert_eq!(quoted_price(8_000, 0), 8_000);
        assert_eq!(quoted_price(8_000, 2_500), 10_500);
    }

    #[test]
    fn processing_fee_percent_plus_fixed() {
        // 2.9% + $0.30 on $100.00
        assert_eq!(processing_fee(10_000, 290, 30), 320);
        // Rounds down
        assert_eq!(processing_fee(9_999, 290, 30), 319);
    }
}
