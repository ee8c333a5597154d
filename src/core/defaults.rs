//! Named defaults substituted for missing or malformed source data, and the
//! [`TransformConfig`] that lets callers override them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency used when the source carries none.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Endpoint scheme used when an IDoc endpoint resolves to an empty scheme.
/// The IDoc senders this crate targets are Belgian; 0208 is the Belgian
/// enterprise number (KBO/BCE).
pub const DEFAULT_ENDPOINT_SCHEME: &str = "0208";

/// Scheme the partner decision table falls back to (GS1 GLN).
pub const DEFAULT_PARTNER_SCHEME: &str = "0088";

/// Rendered in place of any date that is not `YYYYMMDD`.
pub const SENTINEL_DATE: &str = "1970-01-01";

/// Line ID used when a line carries no position. Lines without positions
/// collide on this value.
pub const FALLBACK_LINE_ID: &str = "1";

/// Unit code used when a line has no unit at all.
pub const DEFAULT_UNIT_CODE: &str = "C62";

/// Exemption reason rendered for zero-rated (category E) tax groups.
pub const DEFAULT_EXEMPTION_REASON: &str = "Exempt from VAT";

/// UNTDID 4461 credit transfer.
pub const DEFAULT_PAYMENT_MEANS_CODE: &str = "30";

/// The sentinel as a date value.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Caller-tunable defaults for a transformation.
///
/// Every field defaults to the constant of the same name in this module, so
/// `TransformConfig::default()` reproduces the fixed behaviour. Unknown keys
/// are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    pub default_currency: String,
    pub default_endpoint_scheme: String,
    pub exemption_reason: String,
    pub payment_means_code: String,
    pub customization_id: String,
    pub profile_id: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            default_endpoint_scheme: DEFAULT_ENDPOINT_SCHEME.to_string(),
            exemption_reason: DEFAULT_EXEMPTION_REASON.to_string(),
            payment_means_code: DEFAULT_PAYMENT_MEANS_CODE.to_string(),
            customization_id: crate::ubl::PEPPOL_CUSTOMIZATION_ID.to_string(),
            profile_id: crate::ubl::PEPPOL_PROFILE_ID.to_string(),
        }
    }
}
