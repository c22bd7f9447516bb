use crate::config::RulesConfig;
use crate::model::{OrderLine, RevenueLine, Transaction};

/// Case-insensitive status comparison, ignoring surrounding whitespace.
pub fn status_is(value: &str, expected: &str) -> bool {
    value.trim().eq_ignore_ascii_case(expected.trim())
}

/// Order lines whose fulfillment status marks them as earned.
pub fn recognized<'a>(orders: &'a [OrderLine], rules: &RulesConfig) -> Vec<RevenueLine<'a>> {
    orders
        .iter()
        .filter(|o| status_is(&o.fulfillment_status, &rules.recognized_status))
        .map(RevenueLine::new)
        .collect()
}

/// Paid order lines not fulfilled within the month they were paid.
///
/// A line with no fulfillment date qualifies. So does one fulfilled in a
/// different month, which therefore also appears in the recognized bucket.
pub fn deferred<'a>(orders: &'a [OrderLine], rules: &RulesConfig) -> Vec<RevenueLine<'a>> {
    orders
        .iter()
        .filter(|o| status_is(&o.financial_status, &rules.paid_status))
        .filter(|o| o.fulfilled_at.is_none() || o.paid_month != o.fulfilled_month)
        .map(RevenueLine::new)
        .collect()
}

/// Customer charges; refunds, payouts and adjustments are left out.
pub fn charges<'a>(transactions: &'a [Transaction], rules: &RulesConfig) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| status_is(&t.kind, &rules.charge_type))
        .collect()
}
