//! Unit-of-measure mapping from source unit codes to UN/ECE Recommendation 20.
//!
//! Each dialect has a small fixed table. Codes missing from the table pass
//! through uppercased and unvalidated; [`is_known_unit_code`] is only
//! consulted by the validator, never during mapping.

use super::defaults::DEFAULT_UNIT_CODE;

/// A source-unit → Rec 20 table. Keys are uppercase.
pub type UnitTable = &'static [(&'static str, &'static str)];

/// SAP units as they appear in `E1EDP01/MENEE`.
pub static IDOC_UNITS: UnitTable = &[
    ("ST", "C62"),  // Stück
    ("ROL", "NAR"), // Rolle
    ("PK", "NMP"),  // Paket
    ("PCE", "H87"), // Piece
];

/// Units used by the intermediary schema.
pub static VASCO_UNITS: UnitTable = &[
    ("ST", "C62"),
    ("ROL", "NAR"),
    ("PK", "NMP"),
    ("PCE", "C62"),
];

/// Map a raw unit through `table`. Absent or blank units become `C62`.
pub fn map_unit_code(raw: Option<&str>, table: UnitTable) -> String {
    let upper = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_uppercase(),
        None => {
            tracing::debug!(fallback = DEFAULT_UNIT_CODE, "line without unit code");
            return DEFAULT_UNIT_CODE.to_string();
        }
    };

    match table.iter().find(|(from, _)| *from == upper) {
        Some((_, to)) => (*to).to_string(),
        None => {
            if !is_known_unit_code(&upper) {
                tracing::debug!(unit = %upper, "unmapped unit code passed through");
            }
            upper
        }
    }
}

/// Check whether `code` is a known UN/CEFACT Rec 20 unit code.
pub fn is_known_unit_code(code: &str) -> bool {
    COMMON_UNIT_CODES.binary_search(&code).is_ok()
}

/// Rec 20 codes seen on Peppol invoices. Sorted for binary search.
static COMMON_UNIT_CODES: &[&str] = &[
    "ANN", // Year
    "BX",  // Box
    "C62", // One (piece/unit)
    "CMT", // Centimetre
    "CT",  // Carton
    "DAY", // Day
    "DZN", // Dozen
    "EA",  // Each
    "GRM", // Gram
    "H87", // Piece
    "HUR", // Hour
    "KGM", // Kilogram
    "KMT", // Kilometre
    "KWH", // Kilowatt-hour
    "LS",  // Lump sum
    "LTR", // Litre
    "MIN", // Minute
    "MLT", // Millilitre
    "MMT", // Millimetre
    "MON", // Month
    "MTK", // Square metre
    "MTQ", // Cubic metre
    "MTR", // Metre
    "NAR", // Number of articles
    "NMP", // Number of packs
    "NPR", // Number of pairs
    "PR",  // Pair
    "SET", // Set
    "TNE", // Tonne
    "WEE", // Week
    "XBX", // Box
    "XPK", // Package
    "XPX", // Pallet
    "XRO", // Roll
];
