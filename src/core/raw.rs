//! Source-side records: what a dialect extracts, still as raw strings.
//!
//! Both dialects fill these structs; everything after extraction is shared.
//! Blank strings are stored as `None` by the extractors, so absent and empty
//! source fields behave identically from here on.

use super::identifiers::Endpoint;
use super::model::{BankAccount, DocumentKind, PostalAddress};

/// Extracted header, parties, totals and lines.
#[derive(Debug, Clone)]
pub struct RawInvoice {
    pub kind: DocumentKind,
    pub number: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub currency: Option<String>,
    pub buyer_reference: Option<String>,
    pub order_reference: Option<String>,
    pub despatch_reference: Option<String>,
    pub payment_terms: Option<String>,
    pub bank_account: Option<BankAccount>,
    pub supplier: RawParty,
    pub buyer: RawParty,
    pub totals: RawTotals,
    pub lines: Vec<RawLine>,
}

#[derive(Debug, Clone, Default)]
pub struct RawParty {
    pub name: Option<String>,
    pub vat_number: Option<String>,
    /// Already resolved by the dialect's identifier rules.
    pub endpoint: Option<Endpoint>,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, Default)]
pub struct RawTotals {
    pub net: Option<String>,
    pub tax: Option<String>,
    pub gross: Option<String>,
}

/// How a source line states its unit price.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawPrice {
    /// A price field given directly (locale-ambiguous).
    Rate(String),
    /// Price expressed through a pricing condition: `basis × unit_price_basis`.
    Basis {
        basis_amount: String,
        unit_price_basis: String,
    },
    #[default]
    Missing,
}

#[derive(Debug, Clone, Default)]
pub struct RawLine {
    pub position: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    /// Components summed into the net line amount. Empty = not stated.
    pub net_amounts: Vec<String>,
    pub price: RawPrice,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub seller_item_id: Option<String>,
    pub vat_rate: Option<String>,
    pub tax_amount: Option<String>,
    pub adjustments: Vec<RawAdjustment>,
}

#[derive(Debug, Clone, Default)]
pub struct RawAdjustment {
    pub is_charge: bool,
    pub percentage: Option<String>,
    /// Per-unit basis; multiplied by the line quantity.
    pub basis_amount: Option<String>,
    /// Precomputed amount, preferred when present and non-zero.
    pub calculated_amount: Option<String>,
    pub reason: Option<String>,
    pub vat_rate: Option<String>,
}
