//! Intermediary "Vasco" schema (`Document/Invoice`).

use super::tree::Element;
use super::{SourceDialect, owned};
use crate::core::identifiers::{PartnerId, PartnerIdType, scheme_from_partner};
use crate::core::raw::{RawAdjustment, RawInvoice, RawLine, RawParty, RawPrice, RawTotals};
use crate::core::{BankAccount, Dialect, DocumentKind, Endpoint, MappingError, PostalAddress};

/// The `Invoice` element of a `Document`.
#[derive(Debug, Clone)]
pub struct VascoDocument {
    invoice: Element,
}

impl VascoDocument {
    pub(crate) fn new(invoice: Element) -> Self {
        Self { invoice }
    }
}

impl SourceDialect for VascoDocument {
    fn dialect(&self) -> Dialect {
        Dialect::Intermediary
    }

    fn extract(&self) -> Result<RawInvoice, MappingError> {
        let header = self
            .invoice
            .child("Header")
            .ok_or_else(|| MappingError::missing("element Invoice/Header"))?;
        let supplier = self
            .invoice
            .child("Supplier")
            .ok_or_else(|| MappingError::missing("supplier party (Invoice/Supplier)"))?;
        let buyer = self
            .invoice
            .child("Invoicee")
            .ok_or_else(|| MappingError::missing("buyer party (Invoice/Invoicee)"))?;

        let text = |name: &str| owned(header.child_text(name));

        let bank_account = self.invoice.child("Payment").and_then(|p| {
            Some(BankAccount {
                iban: owned(p.child_text("IBAN"))?,
                bic: owned(p.child_text("BIC")),
                account_name: owned(p.child_text("AccountName")),
            })
        });

        let totals = self
            .invoice
            .child("Totals")
            .map(|t| RawTotals {
                net: owned(t.child_text("NetAmount")),
                tax: owned(t.child_text("TaxAmount")),
                gross: owned(t.child_text("GrossAmount")),
            })
            .unwrap_or_default();

        let lines = self
            .invoice
            .child("Lines")
            .map(|l| l.children("Line").map(line).collect())
            .unwrap_or_default();

        Ok(RawInvoice {
            kind: document_kind(header.child_text("DocumentType")),
            number: text("Number"),
            issue_date: text("IssueDate"),
            due_date: text("DueDate"),
            currency: text("Currency"),
            buyer_reference: text("BuyerReference"),
            order_reference: text("OrderReference"),
            despatch_reference: text("DespatchReference"),
            payment_terms: text("PaymentTerms"),
            bank_account,
            supplier: party(supplier),
            buyer: party(buyer),
            totals,
            lines,
        })
    }
}

fn document_kind(raw: Option<&str>) -> DocumentKind {
    match raw.map(str::to_ascii_uppercase).as_deref() {
        Some("CREDITNOTE" | "381") => DocumentKind::CreditNote,
        Some("INVOICE" | "380") | None => DocumentKind::Invoice,
        Some(other) => {
            tracing::debug!(document_type = other, "unknown document type, rendering invoice");
            DocumentKind::Invoice
        }
    }
}

fn party(el: &Element) -> RawParty {
    let country = owned(el.child_text("Country"));
    let endpoint = el.child("Identifier").and_then(|id| {
        let value = id.text()?;
        let partner = PartnerId {
            id_type: PartnerIdType::from_attr(id.attr("type")),
            identifier: value,
            country: country.as_deref().unwrap_or_default(),
        };
        Some(Endpoint {
            scheme: scheme_from_partner(&partner).to_string(),
            value: value.to_string(),
        })
    });

    RawParty {
        name: owned(el.child_text("Name")),
        vat_number: owned(el.child_text("VatNumber")),
        endpoint,
        address: PostalAddress {
            street: owned(el.child_text("Street")),
            city: owned(el.child_text("City")),
            postal_code: owned(el.child_text("PostalCode")),
            country_code: country,
        },
    }
}

fn line(el: &Element) -> RawLine {
    RawLine {
        position: owned(el.child_text("Position")),
        quantity: owned(el.child_text("Quantity")),
        unit: owned(el.child_text("Unit")),
        net_amounts: el
            .children("NetAmount")
            .filter_map(|n| owned(n.text()))
            .collect(),
        price: match owned(el.child_text("UnitPrice")) {
            Some(rate) => RawPrice::Rate(rate),
            None => RawPrice::Missing,
        },
        currency: owned(el.child_text("Currency")),
        description: owned(el.child_text("Description")),
        seller_item_id: owned(el.child_text("ArticleNumber")),
        vat_rate: owned(el.child_text("VatRate")),
        tax_amount: owned(el.child_text("VatAmount")),
        adjustments: el.children("AllowanceCharge").map(adjustment).collect(),
    }
}

fn adjustment(el: &Element) -> RawAdjustment {
    let is_charge = matches!(
        el.child_text("Indicator").map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "charge" | "+")
    );
    RawAdjustment {
        is_charge,
        percentage: owned(el.child_text("Percentage")),
        basis_amount: owned(el.child_text("BaseAmount")),
        calculated_amount: owned(el.child_text("Amount")),
        reason: owned(el.child_text("Reason")),
        vat_rate: owned(el.child_text("VatRate")),
    }
}
