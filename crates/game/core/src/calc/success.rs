//! Success-rate formulas.

use crate::fixed::Hundredths;

pub const SUCCESS_BASE: i64 = 160;
pub const SUCCESS_SCALE: i64 = 230;

/// Scale for the exact expected-rate computation (percent × 10^20).
const EXPECTED_SCALE: u128 = 100_000_000_000_000_000_000;

/// Single-attempt success rate in percent.
///
/// `floor(160 + 230 / effective × post)` where `effective` is the base
/// potential once the pre-step potential has dropped below it. No clamping.
/// Returns `None` if the product leaves the `i64` range.
pub fn single_success_rate(
    pre_potential: i64,
    post_potential: i64,
    base_potential: i64,
) -> Option<i64> {
    let effective = if pre_potential < base_potential {
        base_potential
    } else {
        pre_potential
    };
    // Guarded by the config contract (base >= 1); keep the division total anyway.
    let effective = effective.max(1);
    SUCCESS_SCALE
        .checked_mul(post_potential)?
        .div_euclid(effective)
        .checked_add(SUCCESS_BASE)
}

/// Expected overall success rate in percent, truncated to hundredths.
///
/// Every attribute value after the step counts as positive (`> 0`) or
/// non-positive. With `P` positive attributes the rate is
/// `min(100, (single / 100)^P × 100)`. Master enhancement removes one positive
/// attribute from `P`.
///
/// A negative single rate counts as 0% before the power is taken, so an even
/// `P` never turns a negative rate into a positive chance.
///
/// ```
/// # use enchant_core::calc::expected_success_rate;
/// let rate = expected_success_rate([4, 2, 7], 80, false);
/// assert_eq!(rate.to_string(), "51.20");
/// ```
pub fn expected_success_rate<I>(values: I, single_rate: i64, master_enhancement: bool) -> Hundredths
where
    I: IntoIterator<Item = i32>,
{
    let (mut positive, mut non_positive) = (0u32, 0u32);
    for value in values {
        if value > 0 {
            positive += 1;
        } else {
            non_positive += 1;
        }
    }

    if positive == 0 {
        return if non_positive > 0 {
            Hundredths::HUNDRED
        } else {
            Hundredths::ZERO
        };
    }
    if master_enhancement {
        positive -= 1;
    }

    let rate = single_rate.max(0) as u128;
    if positive == 0 || rate >= 100 {
        return Hundredths::HUNDRED;
    }

    let mut scaled = 100 * EXPECTED_SCALE;
    for _ in 0..positive {
        scaled = scaled * rate / 100;
        if scaled == 0 {
            break;
        }
    }
    Hundredths::from_raw((scaled / (EXPECTED_SCALE / 100)) as i64)
}
