use criterion::{Criterion, black_box, criterion_group, criterion_main};

use peppol_bridge::Transformer;
use peppol_bridge::core::parse_decimal;
use peppol_bridge::validate::{ValidationProfile, ValidatorRegistry};

const FIXTURE: &str = include_str!("../tests/fixtures/idoc_invoice.xml");

/// An IDoc with `n` priced lines across two VAT rates.
fn idoc_with_lines(n: usize) -> String {
    let mut lines = String::new();
    for i in 1..=n {
        let rate = if i % 3 == 0 { "6" } else { "21" };
        lines.push_str(&format!(
            "<E1EDP01><POSEX>{:06}</POSEX><MENGE>2</MENGE><MENEE>ST</MENEE><VPREI>9,99</VPREI>\
             <E1EDP19><QUALF>002</QUALF><KTEXT>Item {i}</KTEXT></E1EDP19>\
             <E1EDP05><ALCKZ>-</ALCKZ><KPERC>5</KPERC><KRATE>9,99</KRATE></E1EDP05>\
             <E1EDP04><MSATZ>{rate}</MSATZ></E1EDP04></E1EDP01>",
            i * 10
        ));
    }
    format!(
        "<INVOIC02><IDOC>\
         <EDI_DC40><SNDLAD>9925:BE0123456789</SNDLAD><RCVLAD>0208:0987654321</RCVLAD></EDI_DC40>\
         <E1EDK01><CURCY>EUR</CURCY><BELNR>BENCH-1</BELNR></E1EDK01>\
         <E1EDKA1><PARVW>RS</PARVW><NAME1>Seller NV</NAME1></E1EDKA1>\
         <E1EDKA1><PARVW>RE</PARVW><NAME1>Buyer BV</NAME1></E1EDKA1>\
         {lines}</IDOC></INVOIC02>"
    )
}

fn bench_transform_fixture(c: &mut Criterion) {
    let transformer = Transformer::new();
    c.bench_function("transform_idoc_fixture", |b| {
        b.iter(|| black_box(transformer.transform(black_box(FIXTURE))));
    });
}

fn bench_normalize_1000_lines(c: &mut Criterion) {
    let xml = idoc_with_lines(1000);
    let transformer = Transformer::new();
    c.bench_function("normalize_1000_lines", |b| {
        b.iter(|| black_box(transformer.normalize(black_box(&xml))));
    });
}

fn bench_transform_1000_lines(c: &mut Criterion) {
    let xml = idoc_with_lines(1000);
    let transformer = Transformer::new();
    c.bench_function("transform_1000_lines", |b| {
        b.iter(|| black_box(transformer.transform(black_box(&xml))));
    });
}

fn bench_validate(c: &mut Criterion) {
    let ubl = Transformer::new().transform(&idoc_with_lines(100)).unwrap();
    let registry = ValidatorRegistry::new();
    c.bench_function("validate_100_lines", |b| {
        b.iter(|| black_box(registry.validate_all(black_box(&ubl), ValidationProfile::PeppolBis3, None)));
    });
}

fn bench_parse_decimal(c: &mut Criterion) {
    c.bench_function("parse_decimal", |b| {
        b.iter(|| {
            black_box(parse_decimal(black_box("1234,56")).ok());
            black_box(parse_decimal(black_box("12.50-")).ok());
        });
    });
}

criterion_group!(
    benches,
    bench_transform_fixture,
    bench_normalize_1000_lines,
    bench_transform_1000_lines,
    bench_validate,
    bench_parse_decimal,
);
criterion_main!(benches);
