//! Dialect-independent normalization: numbers, dates, identifiers, units,
//! lines, allowances/charges and tax.
//!
//! Everything here works on [`raw`] records produced by a source dialect and
//! yields the [`model`] types the renderer consumes.

pub mod allowance;
pub mod dates;
pub mod decimal;
pub mod defaults;
mod error;
pub mod identifiers;
pub mod lines;
mod model;
pub mod raw;
pub mod tax;
pub mod units;

pub use allowance::{calc_adjustment, normalize_adjustment};
pub use decimal::{parse_decimal, round_to};
pub use defaults::TransformConfig;
pub use error::*;
pub use identifiers::{Endpoint, resolve_endpoint, resolve_vat_number, scheme_from_partner};
pub use lines::{LineContext, normalize_line};
pub use model::*;
pub use tax::{aggregate_by_rate, document_totals};
pub use units::{is_known_unit_code, map_unit_code};
