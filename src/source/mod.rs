//! Source dialects and their detection.
//!
//! A document is read into an element tree, classified once by its root, and
//! then extracted into a [`RawInvoice`](crate::core::raw::RawInvoice) by the
//! matching dialect. Nothing after extraction depends on the dialect except
//! the small [`Dialect`] profile (price scale, unit table).

#[cfg(any(feature = "idoc", feature = "vasco"))]
mod detect;
#[cfg(feature = "idoc")]
mod idoc;
pub mod tree;
#[cfg(feature = "vasco")]
mod vasco;

#[cfg(any(feature = "idoc", feature = "vasco"))]
pub use detect::SourceDocument;
#[cfg(feature = "idoc")]
pub use idoc::IdocDocument;
#[cfg(feature = "vasco")]
pub use vasco::VascoDocument;

use crate::core::raw::RawInvoice;
use crate::core::{Dialect, MappingError};

/// A source format that can be reduced to the shared raw model.
pub trait SourceDialect {
    fn dialect(&self) -> Dialect;

    /// Pull header, parties, totals and lines out of the source tree.
    ///
    /// Fails only on structural problems (missing header or party records)
    /// and on non-numeric values in numeric fields.
    fn extract(&self) -> Result<RawInvoice, MappingError>;
}

/// Non-blank text as an owned string.
#[cfg(any(feature = "idoc", feature = "vasco"))]
fn owned(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
