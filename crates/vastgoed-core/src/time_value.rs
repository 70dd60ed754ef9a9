use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

/// Starting point for the Newton-Raphson IRR search (10%).
pub const IRR_INITIAL_GUESS: Rate = dec!(0.10);
/// Stop once successive rate estimates differ by less than this.
pub const IRR_TOLERANCE: Rate = dec!(0.0001);
pub const IRR_MAX_ITERATIONS: u32 = 100;
/// An estimate at or below -100% is treated as divergence.
pub const IRR_LOWER_BOUND: Rate = dec!(-1.0);
/// An estimate above 1000% is treated as divergence.
pub const IRR_UPPER_BOUND: Rate = dec!(10.0);

const DERIVATIVE_FLOOR: Decimal = dec!(0.000000001);

/// Net Present Value of a series of annual cash flows (t = 0 first).
///
/// Returns `None` when the discount factor cannot be represented.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> Option<Money> {
    npv_and_derivative(cash_flows, rate).map(|(value, _)| value)
}

/// Internal Rate of Return as a fraction, via Newton-Raphson.
///
/// Total: divergence outside [`IRR_LOWER_BOUND`, `IRR_UPPER_BOUND`], a flat
/// derivative, arithmetic overflow or failure to converge within
/// [`IRR_MAX_ITERATIONS`] all yield zero.
pub fn irr(cash_flows: &[Money]) -> Rate {
    if cash_flows.len() < 2 {
        return Decimal::ZERO;
    }

    let mut rate = IRR_INITIAL_GUESS;

    for _ in 0..IRR_MAX_ITERATIONS {
        let Some((value, derivative)) = npv_and_derivative(cash_flows, rate) else {
            tracing::debug!(%rate, "IRR: discount factor overflow");
            return Decimal::ZERO;
        };

        if derivative.abs() < DERIVATIVE_FLOOR {
            tracing::debug!(%rate, "IRR: derivative near zero");
            return Decimal::ZERO;
        }

        let Some(next) = value
            .checked_div(derivative)
            .and_then(|step| rate.checked_sub(step))
        else {
            return Decimal::ZERO;
        };

        if next <= IRR_LOWER_BOUND || next > IRR_UPPER_BOUND {
            tracing::debug!(%next, "IRR: estimate left the search bounds");
            return Decimal::ZERO;
        }

        if (next - rate).abs() < IRR_TOLERANCE {
            return next;
        }

        rate = next;
    }

    tracing::debug!(
        iterations = IRR_MAX_ITERATIONS,
        "IRR: no convergence, reporting zero"
    );
    Decimal::ZERO
}

/// IRR expressed as a 0–100 percentage.
pub fn irr_pct(cash_flows: &[Money]) -> Percent {
    irr(cash_flows) * dec!(100)
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr.
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE; // 1 / (1+r)^t

    for (t, cf) in cash_flows.iter().enumerate() {
        npv = npv.checked_add(cf.checked_mul(discount)?)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let term = Decimal::from(t as u64)
                .checked_mul(*cf)?
                .checked_mul(discount)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_sub(term)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv, dnpv))
}

/// Multiplier `(1 + pct/100)^periods`, built by repeated multiplication.
///
/// Saturates at the last representable factor rather than overflowing.
pub fn growth_factor(pct: Percent, periods: u32) -> Decimal {
    let step = Decimal::ONE + pct / dec!(100);
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        match factor.checked_mul(step) {
            Some(next) => factor = next,
            None => break,
        }
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs);
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.001), "got {result}");
    }

    #[test]
    fn test_irr_no_sign_change_is_zero() {
        let cfs = vec![dec!(1000), dec!(400), dec!(400)];
        assert_eq!(irr(&cfs), Decimal::ZERO);
    }

    #[test]
    fn test_irr_single_flow_is_zero() {
        assert_eq!(irr(&[dec!(-1000)]), Decimal::ZERO);
    }

    #[test]
    fn test_irr_divergent_upper_bound_is_zero() {
        // True IRR is 1999% which lies outside the 1000% bound
        let cfs = vec![dec!(-1), dec!(20.99)];
        assert_eq!(irr(&cfs), Decimal::ZERO);
    }

    #[test]
    fn test_irr_pct_scales() {
        let cfs = vec![dec!(-1000), dec!(1100)];
        let pct = irr_pct(&cfs);
        assert!((pct - dec!(10)).abs() < dec!(0.01), "got {pct}");
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        assert_eq!(npv(dec!(0.0), &cfs), Some(dec!(50)));
    }

    #[test]
    fn test_growth_factor() {
        assert_eq!(growth_factor(dec!(2), 0), Decimal::ONE);
        assert_eq!(growth_factor(dec!(2), 2), dec!(1.0404));
        assert_eq!(growth_factor(Decimal::ZERO, 30), Decimal::ONE);
    }
}
