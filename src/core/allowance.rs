//! Line-level allowance and charge amounts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::decimal::{mul, parse_optional, round_amount, total};
use super::error::MappingError;
use super::model::Adjustment;
use super::raw::RawAdjustment;

/// Amount of an adjustment, 2 decimals, signed as in the source.
///
/// A non-zero precomputed amount wins. Otherwise the amount is
/// `basis × quantity × percentage / 100`.
pub fn calc_adjustment(adj: &RawAdjustment, line_quantity: Decimal) -> Result<Decimal, MappingError> {
    if let Some(explicit) = explicit_amount(adj)? {
        return Ok(round_amount(explicit));
    }
    let base = adjustment_base(adj, line_quantity)?;
    let percentage = parse_optional(adj.percentage.as_deref())?.unwrap_or(Decimal::ZERO);
    Ok(round_amount(mul(base, percentage)? / dec!(100)))
}

/// Normalize an adjustment for rendering. Returns `None` when the amount is
/// zero at 2 decimals: such adjustments are dropped from the output.
pub fn normalize_adjustment(
    adj: &RawAdjustment,
    line_quantity: Decimal,
    line_rate: Decimal,
) -> Result<Option<Adjustment>, MappingError> {
    let amount = calc_adjustment(adj, line_quantity)?;
    if amount.is_zero() {
        tracing::debug!(reason = ?adj.reason, "zero adjustment suppressed");
        return Ok(None);
    }

    let (base_amount, percentage) = if explicit_amount(adj)?.is_some() {
        (None, None)
    } else {
        let base = adjustment_base(adj, line_quantity)?;
        let percentage = parse_optional(adj.percentage.as_deref())?;
        (Some(round_amount(base.abs())), percentage)
    };

    Ok(Some(Adjustment {
        is_charge: adj.is_charge,
        amount: amount.abs(),
        base_amount,
        percentage,
        reason: adj.reason.clone(),
        tax_rate: parse_optional(adj.vat_rate.as_deref())?.unwrap_or(line_rate),
    }))
}

/// Signed effect on the line net amount: charges add, allowances subtract.
pub fn net_effect(adjustments: &[Adjustment]) -> Result<Decimal, MappingError> {
    total(
        adjustments
            .iter()
            .map(|a| if a.is_charge { a.amount } else { -a.amount }),
    )
}

fn explicit_amount(adj: &RawAdjustment) -> Result<Option<Decimal>, MappingError> {
    Ok(parse_optional(adj.calculated_amount.as_deref())?.filter(|a| !a.is_zero()))
}

fn adjustment_base(adj: &RawAdjustment, line_quantity: Decimal) -> Result<Decimal, MappingError> {
    let basis = parse_optional(adj.basis_amount.as_deref())?.unwrap_or(Decimal::ZERO);
    mul(basis, line_quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowance(pct: Option<&str>, basis: Option<&str>, calculated: Option<&str>) -> RawAdjustment {
        RawAdjustment {
            is_charge: false,
            percentage: pct.map(Into::into),
            basis_amount: basis.map(Into::into),
            calculated_amount: calculated.map(Into::into),
            reason: Some("Korting".into()),
            vat_rate: None,
        }
    }

    #[test]
    fn explicit_amount_is_rounded_and_used() {
        let adj = allowance(Some("10"), Some("5"), Some("3,456"));
        assert_eq!(calc_adjustment(&adj, dec!(4)).unwrap(), dec!(3.46));
    }

    #[test]
    fn derived_from_basis_and_percentage() {
        // 12.50 × 3 = 37.50; 10% = 3.75
        let adj = allowance(Some("10"), Some("12,50"), None);
        assert_eq!(calc_adjustment(&adj, dec!(3)).unwrap(), dec!(3.75));
    }

    #[test]
    fn explicit_zero_falls_through_to_derivation() {
        let adj = allowance(Some("2"), Some("100"), Some("0.00"));
        assert_eq!(calc_adjustment(&adj, dec!(1)).unwrap(), dec!(2.00));
    }

    #[test]
    fn zero_amount_is_suppressed() {
        let adj = allowance(None, None, Some("0.00"));
        assert_eq!(normalize_adjustment(&adj, dec!(5), dec!(21)).unwrap(), None);

        // 0.004 rounds to zero as well
        let adj = allowance(Some("0.1"), Some("0.004"), None);
        assert_eq!(normalize_adjustment(&adj, dec!(1), dec!(21)).unwrap(), None);
    }

    #[test]
    fn normalized_carries_base_for_derived_amounts() {
        let adj = allowance(Some("10"), Some("12.50"), None);
        let n = normalize_adjustment(&adj, dec!(3), dec!(21)).unwrap().unwrap();
        assert_eq!(n.amount, dec!(3.75));
        assert_eq!(n.base_amount, Some(dec!(37.50)));
        assert_eq!(n.percentage, Some(dec!(10)));
        assert_eq!(n.tax_rate, dec!(21));
        assert!(!n.is_charge);
    }

    #[test]
    fn normalized_amount_is_a_magnitude() {
        let mut adj = allowance(None, None, Some("5.00-"));
        adj.is_charge = true;
        let n = normalize_adjustment(&adj, dec!(1), dec!(6)).unwrap().unwrap();
        assert_eq!(n.amount, dec!(5.00));
        assert_eq!(n.base_amount, None);
    }

    #[test]
    fn non_numeric_percentage_is_fatal() {
        let adj = allowance(Some("ten"), Some("1"), None);
        assert!(calc_adjustment(&adj, dec!(1)).is_err());
    }

    #[test]
    fn oversized_basis_is_an_arithmetic_error() {
        let adj = allowance(Some("10"), Some("79228162514264337593543950335"), None);
        assert!(matches!(
            calc_adjustment(&adj, dec!(2)),
            Err(MappingError::Arithmetic(_))
        ));
    }

    #[test]
    fn net_effect_signs() {
        let a = Adjustment {
            is_charge: false,
            amount: dec!(3),
            base_amount: None,
            percentage: None,
            reason: None,
            tax_rate: dec!(21),
        };
        let c = Adjustment {
            is_charge: true,
            amount: dec!(1.5),
            ..a.clone()
        };
        assert_eq!(net_effect(&[a, c]).unwrap(), dec!(-1.5));
    }
}
