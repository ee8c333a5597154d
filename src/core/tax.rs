//! VAT breakdown and document totals.

use super::decimal::{add, round_amount, total};
use super::error::MappingError;
use super::model::{DocumentTotals, HeaderTotals, NormalizedLine, TaxCategory, TaxSubtotal};

/// Group lines by VAT rate.
///
/// Rates compare numerically, so `21` and `21.00` share a group. Groups keep
/// the order in which their rate first appears. The group tax is the sum of
/// the lines' own tax amounts, not `taxable × rate`.
pub fn aggregate_by_rate(
    lines: &[NormalizedLine],
    exemption_reason: &str,
) -> Result<Vec<TaxSubtotal>, MappingError> {
    let mut groups: Vec<TaxSubtotal> = Vec::new();

    for line in lines {
        match groups.iter_mut().find(|g| g.rate == line.tax_rate) {
            Some(group) => {
                group.taxable_amount = add(group.taxable_amount, line.line_amount)?;
                group.tax_amount = add(group.tax_amount, line.tax_amount)?;
            }
            None => {
                let category = TaxCategory::for_rate(line.tax_rate);
                groups.push(TaxSubtotal {
                    rate: line.tax_rate,
                    category,
                    taxable_amount: line.line_amount,
                    tax_amount: line.tax_amount,
                    exemption_reason: (category == TaxCategory::Exempt)
                        .then(|| exemption_reason.to_string()),
                });
            }
        }
    }

    for group in &mut groups {
        group.taxable_amount = round_amount(group.taxable_amount);
        group.tax_amount = round_amount(group.tax_amount);
    }
    Ok(groups)
}

/// Document totals. Each explicit header total overrides its computed
/// counterpart; gross is only derived when the header has none.
pub fn document_totals(
    header: HeaderTotals,
    lines: &[NormalizedLine],
    subtotals: &[TaxSubtotal],
) -> Result<DocumentTotals, MappingError> {
    let line_extension = round_amount(total(lines.iter().map(|l| l.line_amount))?);
    let computed_tax = total(subtotals.iter().map(|s| s.tax_amount))?;

    let net = round_amount(header.net.unwrap_or(line_extension));
    let tax = round_amount(header.tax.unwrap_or(computed_tax));
    let gross = match header.gross {
        Some(gross) => round_amount(gross),
        None => round_amount(add(net, tax)?),
    };

    if let Some(explicit) = header.net {
        if explicit != line_extension {
            tracing::debug!(%explicit, computed = %line_extension, "header net differs from line sum");
        }
    }

    Ok(DocumentTotals {
        line_extension,
        tax_exclusive: net,
        tax,
        tax_inclusive: gross,
        payable: gross,
    })
}
