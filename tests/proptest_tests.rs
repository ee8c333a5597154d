//! Property-based tests for the arithmetic and the end-to-end conversion.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "idoc")]

use peppol_bridge::Transformer;
use peppol_bridge::core::*;
use peppol_bridge::validate::{ValidationProfile, ValidatorRegistry};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// One generated IDoc line: quantity, unit price in cents, VAT rate.
#[derive(Debug, Clone)]
struct GenLine {
    quantity: u32,
    price_cents: i64,
    rate: u32,
    comma: bool,
}

fn idoc(lines: &[GenLine], credit_note: bool) -> String {
    let sign = if credit_note { "-" } else { "" };
    let mut body = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut price = Decimal::new(line.price_cents, 2).to_string();
        if line.comma {
            price = price.replace('.', ",");
        }
        body.push_str(&format!(
            "<E1EDP01><POSEX>{:06}</POSEX><MENGE>{sign}{}</MENGE><MENEE>ST</MENEE>\
             <VPREI>{sign}{price}</VPREI><E1EDP04><MSATZ>{}</MSATZ></E1EDP04></E1EDP01>",
            (i + 1) * 10,
            line.quantity,
            line.rate,
        ));
    }
    let bsart = if credit_note { "KG" } else { "INVO" };
    format!(
        "<INVOIC02><IDOC>\
         <EDI_DC40><SNDLAD>9925:BE0123456789</SNDLAD><RCVLAD>0208:0987654321</RCVLAD></EDI_DC40>\
         <E1EDK01><CURCY>EUR</CURCY><BSART>{bsart}</BSART><BELNR>PROP-1</BELNR></E1EDK01>\
         <E1EDKA1><PARVW>RS</PARVW><NAME1>Seller</NAME1><ORT01>Gent</ORT01></E1EDKA1>\
         <E1EDKA1><PARVW>RE</PARVW><NAME1>Buyer</NAME1><ORT01>Brussel</ORT01><IHREZ>REF</IHREZ></E1EDKA1>\
         {body}</IDOC></INVOIC02>"
    )
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// 0.01 to 99999.99.
fn arb_price_cents() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Belgian rates, including the exempt zero rate.
fn arb_rate() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![0u32, 6, 12, 21])
}

fn arb_line() -> impl Strategy<Value = GenLine> {
    (1u32..=100u32, arb_price_cents(), arb_rate(), any::<bool>()).prop_map(
        |(quantity, price_cents, rate, comma)| GenLine {
            quantity,
            price_cents,
            rate,
            comma,
        },
    )
}

/// 1-8 lines.
fn arb_lines() -> impl Strategy<Value = Vec<GenLine>> {
    prop::collection::vec(arb_line(), 1..=8)
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// Without header totals, gross is net plus tax and both are line sums.
    #[test]
    fn totals_add_up(lines in arb_lines()) {
        let model = Transformer::new().normalize(&idoc(&lines, false)).unwrap();
        let totals = &model.totals;

        let line_sum: Decimal = model.lines.iter().map(|l| l.line_amount).sum();
        prop_assert_eq!(totals.line_extension, line_sum);
        prop_assert_eq!(totals.tax_exclusive, line_sum);
        prop_assert_eq!(totals.tax_inclusive, totals.tax_exclusive + totals.tax);
        prop_assert_eq!(totals.payable, totals.tax_inclusive);

        let subtotal_tax: Decimal = model.tax_subtotals.iter().map(|s| s.tax_amount).sum();
        prop_assert_eq!(totals.tax, subtotal_tax);
    }

    /// One subtotal per distinct rate, each matching its lines.
    #[test]
    fn one_subtotal_per_rate(lines in arb_lines()) {
        let model = Transformer::new().normalize(&idoc(&lines, false)).unwrap();

        let mut rates: Vec<u32> = lines.iter().map(|l| l.rate).collect();
        rates.sort_unstable();
        rates.dedup();
        prop_assert_eq!(model.tax_subtotals.len(), rates.len());

        for subtotal in &model.tax_subtotals {
            let taxable: Decimal = model
                .lines
                .iter()
                .filter(|l| l.tax_rate == subtotal.rate)
                .map(|l| l.line_amount)
                .sum();
            prop_assert_eq!(subtotal.taxable_amount, taxable);
            prop_assert_eq!(subtotal.category == TaxCategory::Exempt, subtotal.rate.is_zero());
            prop_assert_eq!(subtotal.exemption_reason.is_some(), subtotal.rate.is_zero());
        }
    }

    /// Every amount is rounded to cents.
    #[test]
    fn amounts_have_two_decimals(lines in arb_lines()) {
        let model = Transformer::new().normalize(&idoc(&lines, false)).unwrap();
        for line in &model.lines {
            prop_assert!(line.line_amount.scale() <= 2);
            prop_assert!(line.tax_amount.scale() <= 2);
        }
        prop_assert!(model.totals.tax.scale() <= 2);
        prop_assert!(model.totals.payable.scale() <= 2);
    }

    /// Credit notes carry magnitudes, whatever sign the source used.
    #[test]
    fn credit_note_lines_are_non_negative(lines in arb_lines()) {
        let model = Transformer::new().normalize(&idoc(&lines, true)).unwrap();
        prop_assert_eq!(model.kind, DocumentKind::CreditNote);
        for line in &model.lines {
            prop_assert!(!line.quantity.is_sign_negative());
            prop_assert!(!line.line_amount.is_sign_negative());
            prop_assert!(!line.tax_amount.is_sign_negative());
        }
        prop_assert!(!model.totals.payable.is_sign_negative());
    }

    /// Converted output always satisfies the built-in business rules.
    #[test]
    fn converted_output_validates(lines in arb_lines(), credit_note in any::<bool>()) {
        let xml = Transformer::new().transform(&idoc(&lines, credit_note)).unwrap();
        let report = ValidatorRegistry::new().validate_all(&xml, ValidationProfile::PeppolBis3, None);
        prop_assert!(report.overall_success, "{:?}", report.issues_by_rule());
    }

    /// Comma and dot decimal separators parse to the same value.
    #[test]
    fn comma_and_dot_agree(units in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..=6) {
        let value = Decimal::new(units, scale);
        let dotted = value.to_string();
        let comma = dotted.replace('.', ",");
        prop_assert_eq!(parse_decimal(&dotted).unwrap(), value);
        prop_assert_eq!(parse_decimal(&comma).unwrap(), value);
    }

    /// A trailing minus negates.
    #[test]
    fn trailing_minus_negates(units in 0i64..1_000_000_000i64) {
        let value = Decimal::new(units, 2);
        prop_assert_eq!(parse_decimal(&format!("{value}-")).unwrap(), -value);
    }

    /// Rounding is idempotent and never moves a value by more than half a cent.
    #[test]
    fn rounding_is_stable(units in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..=8) {
        let value = Decimal::new(units, scale);
        let rounded = round_to(value, 2);
        prop_assert_eq!(round_to(rounded, 2), rounded);
        prop_assert!((rounded - value).abs() <= Decimal::new(5, 3));
    }

    /// Arbitrary input never panics; it either converts or returns an error.
    #[test]
    fn arbitrary_input_never_panics(input in ".{0,256}") {
        let _ = peppol_bridge::transform(&input);
    }

    /// Arbitrary segment values inside a well-formed IDoc never panic.
    #[test]
    fn arbitrary_field_values_never_panic(
        menge in "[-0-9,. a-z]{0,12}",
        vprei in "[-0-9,. a-z]{0,12}",
        datum in "[0-9-]{0,10}",
    ) {
        let xml = format!(
            "<INVOIC02><IDOC><E1EDK01><BELNR>X</BELNR></E1EDK01>\
             <E1EDKA1><PARVW>RS</PARVW></E1EDKA1><E1EDKA1><PARVW>RE</PARVW></E1EDKA1>\
             <E1EDK03><IDDAT>012</IDDAT><DATUM>{datum}</DATUM></E1EDK03>\
             <E1EDP01><MENGE>{menge}</MENGE><VPREI>{vprei}</VPREI></E1EDP01>\
             </IDOC></INVOIC02>"
        );
        if let Err(e) = peppol_bridge::transform(&xml) {
            prop_assert!(matches!(e, MappingError::Arithmetic(_)), "{e}");
        }
    }
}
