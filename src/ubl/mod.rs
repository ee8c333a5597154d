//! Peppol BIS Billing 3.0 UBL output.
//!
//! [`render`] writes a [`NormalizedInvoice`](crate::core::NormalizedInvoice)
//! as a UBL 2.1 `Invoice` or `CreditNote` document. The document kind is
//! decided once and drives every element name that differs between the two.

mod render;
pub(crate) mod xml_utils;

pub use render::render;
pub use xml_utils::format_decimal;

/// Peppol BIS Billing 3.0 specification identifier (BT-24).
pub const PEPPOL_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0";

/// Peppol BIS Billing 3.0 profile identifier (BT-23).
pub const PEPPOL_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// UBL 2.1 namespace URIs.
pub mod ubl_ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// CII root namespace, recognised by the validation profile lookup.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
}
