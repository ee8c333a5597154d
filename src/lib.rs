//! # peppol-bridge
//!
//! Converts legacy invoice XML into Peppol BIS Billing 3.0 UBL documents.
//!
//! Two source dialects are understood: SAP IDoc `INVOIC02` and the
//! intermediary "Vasco" schema. Both are reduced to one normalized model,
//! from which an `Invoice` or `CreditNote` is rendered. Conversion is a pure
//! function of its input and a [`TransformConfig`]; it performs no I/O.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Amounts are rounded to 2 decimals with ties away from zero.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "idoc")] {
//! let idoc = r#"<INVOIC02><IDOC>
//!   <E1EDK01><CURCY>EUR</CURCY><BELNR>90001234</BELNR></E1EDK01>
//!   <E1EDKA1><PARVW>RS</PARVW><NAME1>Seller NV</NAME1></E1EDKA1>
//!   <E1EDKA1><PARVW>RE</PARVW><NAME1>Buyer BV</NAME1></E1EDKA1>
//!   <E1EDP01><POSEX>000010</POSEX><MENGE>2</MENGE><MENEE>ST</MENEE>
//!     <VPREI>50,00</VPREI><E1EDP04><MSATZ>21</MSATZ></E1EDP04></E1EDP01>
//! </IDOC></INVOIC02>"#;
//!
//! let ubl = peppol_bridge::transform(idoc).unwrap();
//! assert!(ubl.contains("<cbc:InvoiceTypeCode>380</cbc:InvoiceTypeCode>"));
//! assert!(ubl.contains(r#"<cbc:PayableAmount currencyID="EUR">121.00</cbc:PayableAmount>"#));
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `idoc` (default) | SAP IDoc INVOIC02 source dialect |
//! | `vasco` (default) | Intermediary `Document/Invoice` source dialect |
//! | `all` | Everything |

pub mod core;
#[cfg(any(feature = "idoc", feature = "vasco"))]
pub mod pipeline;
pub mod source;
pub mod ubl;
pub mod validate;

pub use crate::core::{MappingError, NormalizedInvoice, TransformConfig};
#[cfg(any(feature = "idoc", feature = "vasco"))]
pub use pipeline::{Transformer, transform};
