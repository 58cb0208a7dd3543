//! Amortization Calculator
//!
//! Fixed-payment (Price table) loan math. The forward calculation turns a
//! principal into a monthly payment; the inverse solves the same annuity
//! identity for the principal a target payment can carry, which yields the
//! down payment the buyer needs.
//!
//! ```text
//!            P · r · (1+r)^n                      T · ((1+r)^n − 1)
//!  payment = ───────────────        principal =  ─────────────────
//!             (1+r)^n − 1                           r · (1+r)^n
//! ```
//!
//! A zero monthly rate is handled linearly (`P / n`, `T · n`).

use crate::error::{AdvisorError, Result};
use crate::model::FinancingQuote;

/// Longest term a quote is computed for (50 years)
pub const MAX_INSTALLMENTS: f64 = 600.0;

fn validate(installments: f64, annual_rate: f64) -> Result<()> {
    if !(1.0..=MAX_INSTALLMENTS).contains(&installments) {
        return Err(AdvisorError::InvalidParameter(format!(
            "número de parcelas deve estar entre 1 e {MAX_INSTALLMENTS} (recebido {installments})"
        )));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(AdvisorError::InvalidParameter(format!(
            "taxa de juros inválida ({annual_rate})"
        )));
    }
    Ok(())
}

/// `(1 + r)^n`
fn growth_factor(monthly_rate: f64, installments: f64) -> f64 {
    (1.0 + monthly_rate).powf(installments)
}

/// Monthly payment that amortizes `principal` over `installments` periods
pub fn annuity_payment(principal: f64, monthly_rate: f64, installments: f64) -> f64 {
    if monthly_rate > 0.0 {
        let factor = growth_factor(monthly_rate, installments);
        principal * monthly_rate * factor / (factor - 1.0)
    } else {
        principal / installments
    }
}

/// Principal that `payment` amortizes over `installments` periods
pub fn annuity_principal(payment: f64, monthly_rate: f64, installments: f64) -> f64 {
    if monthly_rate > 0.0 {
        let factor = growth_factor(monthly_rate, installments);
        payment * (factor - 1.0) / (monthly_rate * factor)
    } else {
        payment * installments
    }
}

/// Forward quote: monthly payment for a price, down payment and term.
///
/// `annual_rate` is a fraction (0.12 for 12% a year).
pub fn compute_installment(
    price: f64,
    down_payment: f64,
    installments: f64,
    annual_rate: f64,
) -> Result<FinancingQuote> {
    validate(installments, annual_rate)?;

    let principal = price - down_payment;
    let monthly_rate = annual_rate / 12.0;
    let monthly_payment = annuity_payment(principal, monthly_rate, installments);
    let total_paid = monthly_payment * installments;

    Ok(FinancingQuote {
        vehicle_price: price,
        down_payment,
        principal,
        annual_rate,
        monthly_rate,
        installments,
        monthly_payment,
        total_paid,
        total_interest: total_paid - principal,
        bank: None,
    })
}

/// Inverse quote: down payment needed to reach a target monthly payment.
///
/// A target large enough to finance more than the price needs no down
/// payment; the result is clamped at zero.
pub fn compute_required_down_payment(
    price: f64,
    target_payment: f64,
    installments: f64,
    annual_rate: f64,
) -> Result<FinancingQuote> {
    validate(installments, annual_rate)?;

    let monthly_rate = annual_rate / 12.0;
    let financeable = annuity_principal(target_payment, monthly_rate, installments);
    let down_payment = (price - financeable).max(0.0);
    let principal = price - down_payment;
    let total_paid = target_payment * installments;

    Ok(FinancingQuote {
        vehicle_price: price,
        down_payment,
        principal,
        annual_rate,
        monthly_rate,
        installments,
        monthly_payment: target_payment,
        total_paid,
        total_interest: total_paid - principal,
        bank: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() / scale < tolerance
    }

    #[test]
    fn test_forward_payment_known_value() {
        // 70 000 over 48 months at 1% a month
        let quote = compute_installment(80_000.0, 10_000.0, 48.0, 0.12).unwrap();
        assert!((quote.principal - 70_000.0).abs() < f64::EPSILON);
        assert!((quote.monthly_rate - 0.01).abs() < 1e-15);
        assert!(relative_eq(quote.monthly_payment, 1_843.368_480_2, 1e-9));
        assert!(relative_eq(quote.total_paid, quote.monthly_payment * 48.0, 1e-12));
        assert!(relative_eq(
            quote.total_interest,
            quote.total_paid - 70_000.0,
            1e-12
        ));
    }

    #[test]
    fn test_round_trip_recovers_down_payment() {
        let forward = compute_installment(80_000.0, 10_000.0, 48.0, 0.12).unwrap();
        let inverse =
            compute_required_down_payment(80_000.0, forward.monthly_payment, 48.0, 0.12).unwrap();
        assert!(relative_eq(inverse.down_payment, 10_000.0, 1e-6));
        assert!(relative_eq(inverse.principal, 70_000.0, 1e-6));
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let quote = compute_installment(60_000.0, 0.0, 60.0, 0.0).unwrap();
        assert_eq!(quote.monthly_payment, 60_000.0 / 60.0);
        assert_eq!(quote.total_interest, 0.0);
        assert!(quote.monthly_payment.is_finite());

        let inverse = compute_required_down_payment(60_000.0, 500.0, 60.0, 0.0).unwrap();
        assert_eq!(inverse.down_payment, 30_000.0);
    }

    #[test]
    fn test_large_target_clamps_down_payment_to_zero() {
        let quote = compute_required_down_payment(50_000.0, 5_000.0, 60.0, 0.12).unwrap();
        assert_eq!(quote.down_payment, 0.0);
        assert_eq!(quote.principal, 50_000.0);
        assert!(quote.total_paid > quote.principal);
    }

    #[test]
    fn test_long_terms_stay_accurate() {
        let payment = annuity_payment(100_000.0, 0.015, 84.0);
        let principal = annuity_principal(payment, 0.015, 84.0);
        assert!(relative_eq(principal, 100_000.0, 1e-9));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(compute_installment(80_000.0, 0.0, 0.0, 0.12).is_err());
        assert!(compute_installment(80_000.0, 0.0, 48.0, -0.1).is_err());
        assert!(compute_required_down_payment(80_000.0, 1_000.0, f64::NAN, 0.12).is_err());
    }

    #[test]
    fn test_term_beyond_limit_is_rejected() {
        assert!(compute_installment(80_000.0, 0.0, MAX_INSTALLMENTS, 0.12).unwrap().monthly_payment.is_finite());
        assert!(compute_installment(80_000.0, 0.0, 100_000.0, 0.12).is_err());
        assert!(compute_required_down_payment(80_000.0, 1_000.0, 100_000.0, 0.12).is_err());
    }
}
