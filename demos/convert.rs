//! Convert a source invoice to Peppol UBL and print it.
//!
//! ```sh
//! cargo run --example convert -- path/to/idoc.xml
//! RUST_LOG=peppol_bridge=debug cargo run --example convert
//! ```
//!
//! Without a path the bundled IDoc fixture is converted.

use peppol_bridge::Transformer;
use peppol_bridge::source::{SourceDialect, SourceDocument};
use tracing_subscriber::EnvFilter;

const FIXTURE: &str = include_str!("../tests/fixtures/idoc_invoice.xml");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("peppol_bridge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let xml = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("cannot read {path}: {e}");
            std::process::exit(2);
        }),
        None => FIXTURE.to_string(),
    };

    let document = match SourceDocument::parse(&xml) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Not a supported source document: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("Dialect: {}", document.dialect().name());

    let transformer = Transformer::new();
    let model = match transformer.normalize_document(&document) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Conversion failed: {e}");
            std::process::exit(1);
        }
    };
    eprintln!(
        "{} {}: {} lines, payable {} {}",
        model.kind.root_element(),
        model.number,
        model.lines.len(),
        model.totals.payable,
        model.currency_code,
    );

    match transformer.transform(&xml) {
        Ok(ubl) => println!("{ubl}"),
        Err(e) => {
            eprintln!("Rendering failed: {e}");
            std::process::exit(1);
        }
    }
}
