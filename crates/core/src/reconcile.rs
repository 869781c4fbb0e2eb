use rust_decimal::Decimal;

use crate::domain::order::ComposedOrder;

/// Outcome counters for one reconciliation sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub orders_reconciled: usize,
    pub provisional_kept: usize,
}

/// Overwrite each order's provisional `total_amount` with the sum of its
/// line-item totals. Abandoned orders keep the provisional figure so the
/// header still looks like a real cart; those are counted separately.
pub fn reconcile_totals(orders: &mut [ComposedOrder]) -> ReconciliationReport {
    let mut report = ReconciliationReport::default();

    for composed in orders.iter_mut() {
        if composed.is_abandoned() {
            report.provisional_kept += 1;
            continue;
        }

        let total: Decimal = composed.items.iter().map(|item| item.total_price).sum();
        composed.order.total_amount = total.round_dp(2);
        report.orders_reconciled += 1;
    }

    if report.provisional_kept > 0 {
        tracing::warn!(
            count = report.provisional_kept,
            "orders kept provisional totals (no line items)"
        );
    }

    report
}
