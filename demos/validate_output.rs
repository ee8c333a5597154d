//! Convert a source invoice and run the validator registry over the result.

use peppol_bridge::transform;
use peppol_bridge::validate::{ValidationProfile, ValidatorRegistry};

fn main() {
    let source = include_str!("../tests/fixtures/idoc_credit_note.xml");
    let ubl = transform(source).expect("fixture should convert");

    let profile = std::env::args()
        .nth(1)
        .map(|p| p.parse::<ValidationProfile>())
        .transpose()
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(2);
        })
        .unwrap_or(ValidationProfile::PeppolBis3);

    let registry = ValidatorRegistry::new();
    println!("Validators:");
    for info in registry.list_validators() {
        println!("  {} ({}) local={}", info.name, info.validator_type, info.is_local);
    }

    let report = registry.validate_all(&ubl, profile, None);
    println!(
        "\nProfile {profile}: success={} errors={} warnings={}",
        report.overall_success, report.total_errors, report.total_warnings
    );
    for (rule, hits) in report.issues_by_rule() {
        for hit in hits {
            println!("  [{:?}] {rule}: {} ({})", hit.severity, hit.message, hit.validator);
        }
    }

    // Break a total on purpose to show a failing rule.
    let tampered = ubl.replace(">36.30</cbc:TaxInclusiveAmount>", ">40.00</cbc:TaxInclusiveAmount>");
    let report = registry.validate_all(&tampered, profile, None);
    println!("\nTampered: success={}", report.overall_success);
    for (rule, hits) in report.issues_by_rule() {
        println!("  {rule}: {}", hits[0].message);
    }
}
