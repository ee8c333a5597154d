//! Per-line derivations: ID, quantity, unit, price, adjustments, net amount
//! and line tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::allowance::{net_effect, normalize_adjustment};
use super::decimal::{add, mul, parse_decimal, parse_optional, round_amount, round_to, sum};
use super::defaults::FALLBACK_LINE_ID;
use super::error::MappingError;
use super::model::{Dialect, NormalizedLine, TaxCategory};
use super::raw::{RawLine, RawPrice};
use super::units::map_unit_code;

/// Document-level facts every line needs.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub is_credit_note: bool,
    pub dialect: Dialect,
    /// Document currency, already defaulted.
    pub currency: &'a str,
}

/// Normalize one source line.
///
/// Credit notes carry magnitudes for quantity, net amount and line tax; the
/// unit price keeps its source sign in both document kinds. On a credit note
/// adjustments apply to the magnitude of `quantity × price`, so an allowance
/// always lowers the credited amount.
pub fn normalize_line(raw: &RawLine, ctx: &LineContext<'_>) -> Result<NormalizedLine, MappingError> {
    let id = line_id(raw.position.as_deref());

    let mut quantity = parse_optional(raw.quantity.as_deref())?.unwrap_or_else(|| {
        tracing::debug!(line = %id, "line without quantity, using 0");
        Decimal::ZERO
    });
    if ctx.is_credit_note {
        quantity = quantity.abs();
    }

    let unit_code = map_unit_code(raw.unit.as_deref(), ctx.dialect.unit_table());
    let price = round_to(unit_price(&raw.price, &id)?, ctx.dialect.price_scale());

    let tax_rate = parse_optional(raw.vat_rate.as_deref())?.unwrap_or_else(|| {
        tracing::debug!(line = %id, "line without VAT rate, using 0");
        Decimal::ZERO
    });

    let mut adjustments = Vec::with_capacity(raw.adjustments.len());
    for adj in &raw.adjustments {
        if let Some(normalized) = normalize_adjustment(adj, quantity, tax_rate)? {
            adjustments.push(normalized);
        }
    }

    let mut line_amount = if raw.net_amounts.is_empty() {
        let mut base = mul(quantity, price)?;
        if ctx.is_credit_note {
            base = base.abs();
        }
        round_amount(add(base, net_effect(&adjustments)?)?)
    } else {
        round_amount(sum(&raw.net_amounts)?)
    };
    if ctx.is_credit_note {
        line_amount = line_amount.abs();
    }

    let tax_amount = match parse_optional(raw.tax_amount.as_deref())? {
        Some(explicit) if ctx.is_credit_note => round_amount(explicit).abs(),
        Some(explicit) => round_amount(explicit),
        None => line_tax(line_amount, tax_rate)?,
    };

    let name = raw
        .description
        .clone()
        .or_else(|| raw.seller_item_id.clone())
        .unwrap_or_else(|| id.clone());

    Ok(NormalizedLine {
        id,
        quantity,
        unit_code,
        line_amount,
        price,
        currency: raw
            .currency
            .clone()
            .unwrap_or_else(|| ctx.currency.to_string()),
        name,
        description: raw.description.clone(),
        seller_item_id: raw.seller_item_id.clone(),
        tax_rate,
        tax_category: TaxCategory::for_rate(tax_rate),
        tax_amount,
        adjustments,
    })
}

/// Tax on a single line, 2 decimals.
pub fn line_tax(net: Decimal, rate: Decimal) -> Result<Decimal, MappingError> {
    Ok(round_amount(mul(net, rate)? / dec!(100)))
}

/// Numeric positions lose their leading zeros (`000010` → `10`); anything
/// else is kept verbatim. A missing position falls back to `"1"`.
pub fn line_id(position: Option<&str>) -> String {
    match position.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.bytes().all(|b| b.is_ascii_digit()) => {
            let stripped = p.trim_start_matches('0');
            if stripped.is_empty() { "0" } else { stripped }.to_string()
        }
        Some(p) => p.to_string(),
        None => {
            tracing::warn!(
                fallback = FALLBACK_LINE_ID,
                "line without position; line IDs may collide"
            );
            FALLBACK_LINE_ID.to_string()
        }
    }
}

fn unit_price(price: &RawPrice, line: &str) -> Result<Decimal, MappingError> {
    match price {
        RawPrice::Rate(raw) => parse_decimal(raw),
        RawPrice::Basis {
            basis_amount,
            unit_price_basis,
        } => mul(parse_decimal(basis_amount)?, parse_decimal(unit_price_basis)?),
        RawPrice::Missing => {
            tracing::debug!(line, "line without price, using 0");
            Ok(Decimal::ZERO)
        }
    }
}
