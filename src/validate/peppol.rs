//! Local subset of the Peppol BIS Billing 3.0 and EN 16931 business rules,
//! checked on a rendered UBL document.

use rust_decimal::Decimal;

use super::{Issue, ValidationProfile, ValidationResult, Validator};
use crate::core::{is_known_unit_code, parse_decimal};
use crate::source::tree::{self, Element};

/// Tolerance for sum checks on 2-decimal amounts.
const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Checks a rendered Invoice or CreditNote for the rules the conversion can
/// get wrong. The `PEPPOL-` rules only run for the Peppol profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeppolRulesValidator;

impl PeppolRulesValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for PeppolRulesValidator {
    fn name(&self) -> &str {
        "Peppol rules (local)"
    }

    fn validator_type(&self) -> &str {
        "peppol-rules"
    }

    fn description(&self) -> &str {
        "Built-in checks for endpoints, references, currencies, totals and line quantities"
    }

    fn supported_profiles(&self) -> &[ValidationProfile] {
        &[ValidationProfile::PeppolBis3, ValidationProfile::En16931Ubl]
    }

    fn validate(&self, document: &str, profile: ValidationProfile) -> ValidationResult {
        let issues = if self.supported_profiles().contains(&profile) {
            check(document, profile == ValidationProfile::PeppolBis3)
        } else {
            vec![Issue::warning(
                "VALIDATOR-PROFILE",
                format!("profile {profile} is not checked by this validator"),
            )]
        };
        ValidationResult::from_issues(self, profile, issues)
    }
}

fn check(document: &str, peppol: bool) -> Vec<Issue> {
    let root = match tree::parse(document) {
        Ok(root) => root,
        Err(e) => return vec![Issue::error("XML-PARSE", e.to_string())],
    };
    let is_credit_note = match root.name.as_str() {
        "Invoice" => false,
        "CreditNote" => true,
        other => {
            return vec![Issue::error(
                "UBL-ROOT",
                format!("root element {other} is neither Invoice nor CreditNote"),
            )];
        }
    };

    let mut issues = Vec::new();
    if peppol {
        check_empty_elements(&root, &root.name, &mut issues);
        check_endpoints(&root, &mut issues);
        check_references(&root, &mut issues);
        check_currencies(&root, &mut issues);
    }
    check_tax_total(&root, &mut issues);
    check_monetary_total(&root, &mut issues);
    check_lines(&root, is_credit_note, &mut issues);
    issues
}

/// PEPPOL-EN16931-R008: no element may be empty.
fn check_empty_elements(el: &Element, path: &str, issues: &mut Vec<Issue>) {
    for child in &el.children {
        let child_path = format!("{path}/{}", child.name);
        if child.children.is_empty() && child.text().is_none() {
            issues.push(
                Issue::error("PEPPOL-EN16931-R008", format!("element {} is empty", child.name))
                    .at(child_path.clone()),
            );
        }
        check_empty_elements(child, &child_path, issues);
    }
}

/// PEPPOL-EN16931-R020 (seller) and R010 (buyer).
fn check_endpoints(root: &Element, issues: &mut Vec<Issue>) {
    for (wrapper, rule, role) in [
        ("AccountingSupplierParty", "PEPPOL-EN16931-R020", "seller"),
        ("AccountingCustomerParty", "PEPPOL-EN16931-R010", "buyer"),
    ] {
        let endpoint = root
            .child(wrapper)
            .and_then(|w| w.child("Party"))
            .and_then(|p| p.child("EndpointID"));
        match endpoint {
            Some(ep) if ep.text().is_some() => {
                if ep.attr("schemeID").is_none_or(str::is_empty) {
                    issues.push(
                        Issue::error(rule, format!("{role} EndpointID has no schemeID"))
                            .at(format!("{wrapper}/Party/EndpointID")),
                    );
                }
            }
            _ => issues.push(Issue::error(
                rule,
                format!("{role} electronic address (EndpointID) is required"),
            )),
        }
    }
}

/// PEPPOL-EN16931-R003: buyer reference or order reference.
fn check_references(root: &Element, issues: &mut Vec<Issue>) {
    let buyer_ref = root.child_text("BuyerReference");
    let order_ref = root.path_text(&["OrderReference", "ID"]);
    if buyer_ref.is_none() && order_ref.is_none() {
        issues.push(Issue::error(
            "PEPPOL-EN16931-R003",
            "buyer reference or order reference is required",
        ));
    }
}

/// PEPPOL-EN16931-R051: every currencyID equals DocumentCurrencyCode.
fn check_currencies(root: &Element, issues: &mut Vec<Issue>) {
    let Some(document_currency) = root.child_text("DocumentCurrencyCode") else {
        return;
    };
    let mut stack = vec![(root, root.name.clone())];
    while let Some((el, path)) = stack.pop() {
        if let Some(currency) = el.attr("currencyID") {
            if currency != document_currency {
                issues.push(
                    Issue::error(
                        "PEPPOL-EN16931-R051",
                        format!("currencyID {currency} differs from document currency {document_currency}"),
                    )
                    .at(path.clone()),
                );
            }
        }
        for child in &el.children {
            stack.push((child, format!("{path}/{}", child.name)));
        }
    }
}

/// BR-CO-14 and distinct rates per VAT category.
fn check_tax_total(root: &Element, issues: &mut Vec<Issue>) {
    let Some(tax_total) = root.child("TaxTotal") else {
        issues.push(Issue::error("BR-CO-14", "TaxTotal is missing"));
        return;
    };
    let total = amount(tax_total.child_text("TaxAmount"));

    let mut sum = Some(Decimal::ZERO);
    let mut seen: Vec<(String, Decimal)> = Vec::new();
    for subtotal in tax_total.children("TaxSubtotal") {
        let part = amount(subtotal.child_text("TaxAmount")).unwrap_or(Decimal::ZERO);
        sum = sum.and_then(|s| s.checked_add(part));

        let category = subtotal.child("TaxCategory");
        let code = category.and_then(|c| c.child_text("ID")).unwrap_or_default();
        let rate = amount(category.and_then(|c| c.child_text("Percent"))).unwrap_or(Decimal::ZERO);
        if seen.iter().any(|(c, r)| c == code && *r == rate) {
            issues.push(Issue::error(
                "BR-CO-TAX-RATE",
                format!("more than one TaxSubtotal for category {code} at {rate}%"),
            ));
        } else {
            seen.push((code.to_string(), rate));
        }
    }

    if let Some(total) = total {
        if differs(Some(total), sum) {
            issues.push(Issue::error(
                "BR-CO-14",
                match sum {
                    Some(sum) => format!("TaxAmount {total} differs from sum of subtotals {sum}"),
                    None => format!("TaxAmount {total}: sum of subtotals is out of range"),
                },
            ));
        }
    }
}

/// BR-CO-15: total with VAT = total without VAT + VAT.
fn check_monetary_total(root: &Element, issues: &mut Vec<Issue>) {
    let Some(monetary) = root.child("LegalMonetaryTotal") else {
        issues.push(Issue::error("BR-12", "LegalMonetaryTotal is missing"));
        return;
    };
    let net = amount(monetary.child_text("TaxExclusiveAmount"));
    let gross = amount(monetary.child_text("TaxInclusiveAmount"));
    let tax = amount(root.path_text(&["TaxTotal", "TaxAmount"]));
    if let (Some(net), Some(gross), Some(tax)) = (net, gross, tax) {
        if differs(net.checked_add(tax), Some(gross)) {
            issues.push(Issue::error(
                "BR-CO-15",
                format!("TaxInclusiveAmount {gross} is not {net} + {tax}"),
            ));
        }
    }
}

/// Credit-note quantities are magnitudes; unit codes should be Rec 20.
fn check_lines(root: &Element, is_credit_note: bool, issues: &mut Vec<Issue>) {
    let (line_name, quantity_name) = if is_credit_note {
        ("CreditNoteLine", "CreditedQuantity")
    } else {
        ("InvoiceLine", "InvoicedQuantity")
    };

    for (i, line) in root.children(line_name).enumerate() {
        let location = format!("{line_name}[{}]", i + 1);
        let Some(quantity) = line.child(quantity_name) else {
            issues.push(Issue::error("BR-22", "line quantity is missing").at(location));
            continue;
        };
        if is_credit_note && amount(quantity.text()).is_some_and(|q| q.is_sign_negative()) {
            issues.push(
                Issue::error("BR-CN-QTY", "credited quantity must not be negative")
                    .at(location.clone()),
            );
        }
        if let Some(unit) = quantity.attr("unitCode") {
            if !is_known_unit_code(unit) {
                issues.push(
                    Issue::warning("BR-CL-23", format!("unit code {unit} is not a known Rec 20 code"))
                        .at(location),
                );
            }
        }
    }
}

/// Out of tolerance, or out of range altogether.
fn differs(expected: Option<Decimal>, actual: Option<Decimal>) -> bool {
    expected
        .zip(actual)
        .and_then(|(e, a)| e.checked_sub(a))
        .is_none_or(|d| d.abs() > TOLERANCE)
}

fn amount(text: Option<&str>) -> Option<Decimal> {
    text.and_then(|t| parse_decimal(t).ok())
}
