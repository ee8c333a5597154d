//! The normalized invoice model: what both source dialects are reduced to
//! before rendering. Built per transformation and dropped afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::identifiers::Endpoint;
use super::units::{IDOC_UNITS, UnitTable, VASCO_UNITS};
use crate::ubl::ubl_ns;

/// Source dialect a document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// SAP IDoc INVOIC02 (`INVOIC02/IDOC`).
    IDoc,
    /// Intermediary "Vasco" schema (`Document/Invoice`).
    Intermediary,
}

impl Dialect {
    /// Fractional digits of the rendered unit price.
    pub fn price_scale(&self) -> u32 {
        match self {
            Self::IDoc => 6,
            Self::Intermediary => 4,
        }
    }

    pub fn unit_table(&self) -> UnitTable {
        match self {
            Self::IDoc => IDOC_UNITS,
            Self::Intermediary => VASCO_UNITS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::IDoc => "idoc-invoic02",
            Self::Intermediary => "vasco",
        }
    }
}

/// The two output shapes. Selected once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// UNTDID 1001 code 380.
    Invoice,
    /// UNTDID 1001 code 381.
    CreditNote,
}

impl DocumentKind {
    pub fn is_credit_note(&self) -> bool {
        matches!(self, Self::CreditNote)
    }

    /// UNTDID 1001 numeric code.
    pub fn type_code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::CreditNote => 381,
        }
    }

    pub fn root_element(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::CreditNote => "CreditNote",
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Invoice => ubl_ns::INVOICE,
            Self::CreditNote => ubl_ns::CREDIT_NOTE,
        }
    }

    pub fn type_code_element(&self) -> &'static str {
        match self {
            Self::Invoice => "cbc:InvoiceTypeCode",
            Self::CreditNote => "cbc:CreditNoteTypeCode",
        }
    }

    pub fn line_element(&self) -> &'static str {
        match self {
            Self::Invoice => "cac:InvoiceLine",
            Self::CreditNote => "cac:CreditNoteLine",
        }
    }

    pub fn quantity_element(&self) -> &'static str {
        match self {
            Self::Invoice => "cbc:InvoicedQuantity",
            Self::CreditNote => "cbc:CreditedQuantity",
        }
    }
}

/// UNTDID 5305 tax categories produced by the mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// S: standard rate.
    StandardRate,
    /// E: exempt from tax.
    Exempt,
}

impl TaxCategory {
    /// Zero rates are exempt, everything else is standard rated.
    pub fn for_rate(rate: Decimal) -> Self {
        if rate.is_zero() {
            Self::Exempt
        } else {
            Self::StandardRate
        }
    }

    /// UNTDID 5305 code letter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardRate => "S",
            Self::Exempt => "E",
        }
    }
}

/// Postal address. Every part is optional in the sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2.
    pub country_code: Option<String>,
}

/// Supplier or buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    /// VAT number as found in the source (possibly country-prefixed).
    pub vat_number: Option<String>,
    /// VAT number in display form, used as legal registration ID.
    pub legal_id: Option<String>,
    pub endpoint: Option<Endpoint>,
    pub address: PostalAddress,
}

/// Payee bank account (BG-17).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub iban: String,
    pub bic: Option<String>,
    pub account_name: Option<String>,
}

/// A line-level allowance or charge that survived zero-suppression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// True = charge, false = allowance.
    pub is_charge: bool,
    /// Magnitude, 2 decimals. Direction is carried by `is_charge`.
    pub amount: Decimal,
    /// `basis × quantity` when the amount was derived from a percentage.
    pub base_amount: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub reason: Option<String>,
    /// VAT rate of the adjustment. Line-level adjustments are taxed through
    /// the line, so this is informational only.
    pub tax_rate: Decimal,
}

/// One rendered invoice or credit note line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLine {
    /// BT-126 line identifier.
    pub id: String,
    pub quantity: Decimal,
    /// UN/ECE Rec 20 code (or an unmapped source code, uppercased).
    pub unit_code: String,
    /// BT-131 net line amount, 2 decimals.
    pub line_amount: Decimal,
    /// BT-146 net price at the dialect's price scale.
    pub price: Decimal,
    pub currency: String,
    /// BT-153 item name.
    pub name: String,
    /// BT-154 item description, when the source has one.
    pub description: Option<String>,
    pub seller_item_id: Option<String>,
    pub tax_rate: Decimal,
    pub tax_category: TaxCategory,
    /// The line's own tax amount, explicit or computed per line.
    pub tax_amount: Decimal,
    pub adjustments: Vec<Adjustment>,
}

/// BG-23 VAT breakdown for one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSubtotal {
    pub rate: Decimal,
    pub category: TaxCategory,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
    pub exemption_reason: Option<String>,
}

/// Totals stated explicitly in the source header. Each one overrides the
/// computed value when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderTotals {
    pub net: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub gross: Option<Decimal>,
}

/// BG-22 document totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// BT-106 sum of line net amounts.
    pub line_extension: Decimal,
    /// BT-109 total without VAT (final net).
    pub tax_exclusive: Decimal,
    /// BT-110 total VAT (final tax).
    pub tax: Decimal,
    /// BT-112 total with VAT (final gross).
    pub tax_inclusive: Decimal,
    /// BT-115 amount due.
    pub payable: Decimal,
}

/// Everything the renderer needs, fully derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedInvoice {
    pub dialect: Dialect,
    pub kind: DocumentKind,
    /// BT-1.
    pub number: String,
    /// BT-2.
    pub issue_date: NaiveDate,
    /// BT-9.
    pub due_date: Option<NaiveDate>,
    /// BT-5.
    pub currency_code: String,
    /// BT-10.
    pub buyer_reference: Option<String>,
    /// BT-13.
    pub order_reference: Option<String>,
    /// BT-16.
    pub despatch_reference: Option<String>,
    /// BT-20.
    pub payment_terms: Option<String>,
    pub bank_account: Option<BankAccount>,
    pub supplier: Party,
    pub buyer: Party,
    pub lines: Vec<NormalizedLine>,
    pub tax_subtotals: Vec<TaxSubtotal>,
    pub totals: DocumentTotals,
}
