//! Refund or amount-owing determination.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::RefundDetermination;

use super::money::non_negative;

/// Compares PAYE withheld to the calculated liability.
///
/// A positive difference is a refund; a negative one is owed to SARS. The
/// PAYE shortfall is reported separately so callers can suggest topping up
/// PAYE regardless of how the result is framed.
///
/// # Examples
///
/// ```
/// use sa_tax_engine::calculation::determine_refund;
/// use rust_decimal::Decimal;
///
/// let result = determine_refund(Decimal::from(75_000), Decimal::from(69_797));
/// assert!(result.is_refund);
/// assert_eq!(result.refund_amount, Decimal::from(5_203));
/// assert_eq!(result.amount_owed, Decimal::ZERO);
/// ```
pub fn determine_refund(paye_withheld: Decimal, total_tax: Decimal) -> RefundDetermination {
    let paye_withheld = non_negative("paye_withheld", paye_withheld);
    let total_tax = non_negative("total_tax", total_tax);

    let net = paye_withheld - total_tax;
    let determination = RefundDetermination {
        is_refund: net > Decimal::ZERO,
        refund_amount: net.max(Decimal::ZERO),
        amount_owed: (-net).max(Decimal::ZERO),
        paye_shortfall: (total_tax - paye_withheld).max(Decimal::ZERO),
    };

    debug!(
        paye_withheld = %paye_withheld,
        total_tax = %total_tax,
        is_refund = determination.is_refund,
        "Determined refund position"
    );

    determination
}
