//! SAP IDoc INVOIC02.
//!
//! Segments are selected by their qualifier fields (`QUALF`, `IDDAT`,
//! `PARVW`, `SUMID`). The control record `EDI_DC40` supplies fallback
//! endpoints for both parties.

use super::tree::Element;
use super::{SourceDialect, owned};
use crate::core::identifiers::resolve_endpoint;
use crate::core::raw::{RawAdjustment, RawInvoice, RawLine, RawParty, RawPrice, RawTotals};
use crate::core::{BankAccount, Dialect, DocumentKind, MappingError, PostalAddress};

/// `E1EDK01/BSART` value marking a credit memo.
const CREDIT_MEMO_TYPE: &str = "KG";

mod qualifier {
    pub const DOCUMENT_NUMBER: &str = "009";
    pub const ORDER: &str = "001";
    pub const DESPATCH: &str = "012";
    pub const ISSUE_DATE: &str = "012";
    pub const DUE_DATE: &str = "028";
    pub const TOTAL_NET: &str = "010";
    pub const TOTAL_TAX: &str = "005";
    pub const TOTAL_GROSS: &str = "011";
    pub const ITEM_TEXT: &str = "002";
    pub const LINE_NET: &str = "003";
}

/// Partner roles tried in order: invoicing party, then vendor.
const SUPPLIER_ROLES: &[&str] = &["RS", "LF"];
/// Bill-to party, then sold-to party.
const BUYER_ROLES: &[&str] = &["RE", "AG"];

/// The `IDOC` element of an `INVOIC02` document.
#[derive(Debug, Clone)]
pub struct IdocDocument {
    idoc: Element,
}

impl IdocDocument {
    pub(crate) fn new(idoc: Element) -> Self {
        Self { idoc }
    }

    fn segment_field(&self, segment: &str, key: &str, qualifier: &str, field: &str) -> Option<String> {
        owned(
            self.idoc
                .child_where(segment, key, qualifier)
                .and_then(|s| s.child_text(field)),
        )
    }

    fn partner(&self, roles: &[&str]) -> Option<&Element> {
        roles
            .iter()
            .find_map(|role| self.idoc.child_where("E1EDKA1", "PARVW", role))
    }

    fn control_field(&self, field: &str) -> Option<&str> {
        self.idoc.child("EDI_DC40").and_then(|c| c.child_text(field))
    }
}

impl SourceDialect for IdocDocument {
    fn dialect(&self) -> Dialect {
        Dialect::IDoc
    }

    fn extract(&self) -> Result<RawInvoice, MappingError> {
        let header = self
            .idoc
            .child("E1EDK01")
            .ok_or_else(|| MappingError::missing("header segment E1EDK01"))?;

        let kind = match header.child_text("BSART") {
            Some(t) if t.eq_ignore_ascii_case(CREDIT_MEMO_TYPE) => DocumentKind::CreditNote,
            _ => DocumentKind::Invoice,
        };

        let supplier_seg = self
            .partner(SUPPLIER_ROLES)
            .ok_or_else(|| MappingError::missing("supplier party (E1EDKA1 PARVW=RS/LF)"))?;
        let buyer_seg = self
            .partner(BUYER_ROLES)
            .ok_or_else(|| MappingError::missing("buyer party (E1EDKA1 PARVW=RE/AG)"))?;

        let supplier = party(
            supplier_seg,
            header.child_text("EIGENUINR"),
            self.control_field("SNDLAD"),
        );
        let buyer = party(
            buyer_seg,
            header.child_text("KUNDEUINR"),
            self.control_field("RCVLAD"),
        );

        let number = self
            .segment_field("E1EDK02", "QUALF", qualifier::DOCUMENT_NUMBER, "BELNR")
            .or_else(|| owned(header.child_text("BELNR")));

        let bank_account = self.idoc.child("E1EDK28").and_then(|b| {
            Some(BankAccount {
                iban: owned(b.child_text("ACNUM"))?,
                bic: owned(b.child_text("BRNUM")),
                account_name: owned(b.child_text("ACNAM")),
            })
        });

        let totals = RawTotals {
            net: self.segment_field("E1EDS01", "SUMID", qualifier::TOTAL_NET, "SUMME"),
            tax: self.segment_field("E1EDS01", "SUMID", qualifier::TOTAL_TAX, "SUMME"),
            gross: self.segment_field("E1EDS01", "SUMID", qualifier::TOTAL_GROSS, "SUMME"),
        };

        Ok(RawInvoice {
            kind,
            number,
            issue_date: self.segment_field("E1EDK03", "IDDAT", qualifier::ISSUE_DATE, "DATUM"),
            due_date: self.segment_field("E1EDK03", "IDDAT", qualifier::DUE_DATE, "DATUM"),
            currency: owned(header.child_text("CURCY")),
            buyer_reference: owned(buyer_seg.child_text("IHREZ")),
            order_reference: self.segment_field("E1EDK02", "QUALF", qualifier::ORDER, "BELNR"),
            despatch_reference: self.segment_field("E1EDK02", "QUALF", qualifier::DESPATCH, "BELNR"),
            payment_terms: self
                .idoc
                .children("E1EDK18")
                .find_map(|s| owned(s.child_text("ZTERM_TXT"))),
            bank_account,
            supplier,
            buyer,
            totals,
            lines: self.idoc.children("E1EDP01").map(line).collect(),
        })
    }
}

fn party(seg: &Element, vat_number: Option<&str>, fallback_endpoint: Option<&str>) -> RawParty {
    RawParty {
        name: owned(seg.child_text("NAME1")),
        vat_number: owned(vat_number),
        endpoint: resolve_endpoint(seg.path_text(&["Z1EDKA1", "PEPPOLID"]), fallback_endpoint),
        address: PostalAddress {
            street: owned(seg.child_text("STRAS")),
            city: owned(seg.child_text("ORT01")),
            postal_code: owned(seg.child_text("PSTLZ")),
            country_code: owned(seg.child_text("LAND1")),
        },
    }
}

fn line(seg: &Element) -> RawLine {
    let item_text = seg.child_where("E1EDP19", "QUALF", qualifier::ITEM_TEXT);
    let tax = seg.child("E1EDP04");

    let mut price = match owned(seg.child_text("VPREI")) {
        Some(rate) => RawPrice::Rate(rate),
        None => RawPrice::Missing,
    };
    let mut adjustments = Vec::new();

    for cond in seg.children("E1EDP05") {
        match cond.child_text("ALCKZ") {
            Some(indicator) => adjustments.push(RawAdjustment {
                is_charge: indicator == "+",
                percentage: owned(cond.child_text("KPERC")),
                basis_amount: owned(cond.child_text("KRATE")),
                calculated_amount: owned(cond.child_text("BETRG")),
                reason: owned(cond.child_text("KOTXT")),
                vat_rate: owned(cond.child_text("MSATZ")),
            }),
            None if price == RawPrice::Missing => {
                if let Some(basis_amount) = owned(cond.child_text("KRATE")) {
                    price = RawPrice::Basis {
                        basis_amount,
                        unit_price_basis: owned(cond.child_text("UPRBS"))
                            .unwrap_or_else(|| "1".to_string()),
                    };
                }
            }
            None => {}
        }
    }

    RawLine {
        position: owned(seg.child_text("POSEX")),
        quantity: owned(seg.child_text("MENGE")),
        unit: owned(seg.child_text("MENEE")),
        net_amounts: seg
            .children("E1EDP26")
            .filter(|s| s.child_text("QUALF") == Some(qualifier::LINE_NET))
            .filter_map(|s| owned(s.child_text("BETRG")))
            .collect(),
        price,
        currency: owned(seg.child_text("CURCY")),
        description: item_text.and_then(|s| owned(s.child_text("KTEXT"))),
        seller_item_id: item_text.and_then(|s| owned(s.child_text("IDTNR"))),
        vat_rate: tax.and_then(|t| owned(t.child_text("MSATZ"))),
        tax_amount: tax.and_then(|t| owned(t.child_text("MWSBT"))),
        adjustments,
    }
}
