//! Source XML in, Peppol UBL out.

use crate::core::decimal::parse_optional;
use crate::core::dates::{optional_date, required_date};
use crate::core::raw::{RawInvoice, RawParty};
use crate::core::*;
use crate::source::{SourceDialect, SourceDocument};
use crate::ubl;

/// Converts source documents with a fixed [`TransformConfig`].
///
/// Holds no state besides the configuration, so one instance can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: TransformConfig,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Detect the dialect and build the normalized model without rendering.
    pub fn normalize(&self, xml: &str) -> Result<NormalizedInvoice, MappingError> {
        let document = SourceDocument::parse(xml)?;
        self.normalize_document(&document)
    }

    pub fn normalize_document(
        &self,
        document: &SourceDocument,
    ) -> Result<NormalizedInvoice, MappingError> {
        let raw = document.extract()?;
        build_model(raw, document.dialect(), &self.config)
    }

    /// Full conversion: detect, extract, normalize, render.
    pub fn transform(&self, xml: &str) -> Result<String, MappingError> {
        let model = self.normalize(xml)?;
        let _span = tracing::debug_span!(
            "render",
            dialect = model.dialect.name(),
            number = %model.number,
        )
        .entered();
        let out = ubl::render(&model, &self.config)?;
        tracing::debug!(
            kind = model.kind.root_element(),
            lines = model.lines.len(),
            "document rendered"
        );
        Ok(out)
    }
}

/// Convert with the default configuration.
pub fn transform(xml: &str) -> Result<String, MappingError> {
    Transformer::new().transform(xml)
}

/// Assemble the normalized model from extracted source records.
///
/// Lines are normalized first; tax groups and totals are derived from the
/// normalized lines and reconciled with the header totals.
pub fn build_model(
    raw: RawInvoice,
    dialect: Dialect,
    config: &TransformConfig,
) -> Result<NormalizedInvoice, MappingError> {
    let number = raw
        .number
        .ok_or_else(|| MappingError::missing("document number"))?;

    let currency_code = raw.currency.unwrap_or_else(|| {
        tracing::debug!(fallback = %config.default_currency, "document without currency");
        config.default_currency.clone()
    });

    let ctx = LineContext {
        is_credit_note: raw.kind.is_credit_note(),
        dialect,
        currency: &currency_code,
    };
    let lines = raw
        .lines
        .iter()
        .map(|line| normalize_line(line, &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let header = HeaderTotals {
        net: parse_optional(raw.totals.net.as_deref())?,
        tax: parse_optional(raw.totals.tax.as_deref())?,
        gross: parse_optional(raw.totals.gross.as_deref())?,
    };
    let tax_subtotals = aggregate_by_rate(&lines, &config.exemption_reason)?;
    let totals = document_totals(header, &lines, &tax_subtotals)?;

    Ok(NormalizedInvoice {
        dialect,
        kind: raw.kind,
        number,
        issue_date: required_date(raw.issue_date.as_deref()),
        due_date: optional_date(raw.due_date.as_deref()),
        currency_code,
        buyer_reference: raw.buyer_reference,
        order_reference: raw.order_reference,
        despatch_reference: raw.despatch_reference,
        payment_terms: raw.payment_terms,
        bank_account: raw.bank_account,
        supplier: party(raw.supplier, "supplier"),
        buyer: party(raw.buyer, "buyer"),
        lines,
        tax_subtotals,
        totals,
    })
}

fn party(raw: RawParty, role: &str) -> Party {
    let name = raw.name.unwrap_or_else(|| {
        tracing::debug!(role, "party without name");
        String::new()
    });
    if raw.endpoint.is_none() {
        tracing::debug!(role, "party without electronic address");
    }
    Party {
        name,
        legal_id: raw.vat_number.as_deref().map(resolve_vat_number),
        vat_number: raw.vat_number,
        endpoint: raw.endpoint,
        address: raw.address,
    }
}
