//! Electronic address (Peppol EndpointID) and VAT number resolution.

use serde::{Deserialize, Serialize};

use super::defaults::DEFAULT_PARTNER_SCHEME;

/// Electronic Address Scheme (EAS) codes used by the mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EasScheme {
    /// The numeric scheme code (e.g. "0088", "9925").
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

impl EasScheme {
    /// GS1 GLN (Global Location Number).
    pub const GLN: Self = Self {
        code: "0088",
        description: "GS1 GLN",
    };
    /// Belgian enterprise number (KBO/BCE).
    pub const BE_EN: Self = Self {
        code: "0208",
        description: "Belgian enterprise number",
    };
    /// Belgian VAT number.
    pub const BE_VAT: Self = Self {
        code: "9925",
        description: "Belgian VAT number",
    };
    /// German VAT number.
    pub const DE_VAT: Self = Self {
        code: "9930",
        description: "German VAT number",
    };
    /// Dutch VAT number.
    pub const NL_VAT: Self = Self {
        code: "9944",
        description: "Dutch VAT number",
    };
}

/// Resolved electronic address. An empty `scheme` means "use the configured
/// default"; the renderer performs that substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub scheme: String,
    pub value: String,
}

impl Endpoint {
    /// The scheme, or `default` when none was resolvable.
    pub fn scheme_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.scheme.is_empty() {
            default
        } else {
            &self.scheme
        }
    }
}

/// Resolve an endpoint from a structured Peppol ID extension field, falling
/// back to a raw identifier such as an EDI logical address.
///
/// The chosen input is split at the first `:` into scheme and value. Input
/// without a colon is taken as a bare value with no scheme.
pub fn resolve_endpoint(extension: Option<&str>, fallback_raw: Option<&str>) -> Option<Endpoint> {
    let raw = non_blank(extension).or_else(|| non_blank(fallback_raw))?;

    let (scheme, value) = match raw.split_once(':') {
        Some((scheme, value)) => (scheme.trim(), value.trim()),
        None => ("", raw),
    };
    if value.is_empty() {
        tracing::debug!(raw, "endpoint identifier without value");
        return None;
    }
    Some(Endpoint {
        scheme: scheme.to_string(),
        value: value.to_string(),
    })
}

/// VAT number in display form: a leading Belgian `BE` prefix is removed.
/// Other country prefixes are left untouched.
pub fn resolve_vat_number(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_prefix("BE").unwrap_or(raw).to_string()
}

/// Kind of identifier carried by an intermediary partner record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerIdType {
    Ean,
    Vat,
    Other,
}

impl PartnerIdType {
    /// Parse the `type` attribute of a partner identifier (case-insensitive).
    pub fn from_attr(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("EAN") => Self::Ean,
            Some("VAT") => Self::Vat,
            _ => Self::Other,
        }
    }
}

/// The parts of a partner record the scheme decision needs.
#[derive(Debug, Clone, Copy)]
pub struct PartnerId<'a> {
    pub id_type: PartnerIdType,
    pub identifier: &'a str,
    pub country: &'a str,
}

/// VAT identifier schemes by partner country.
pub static VAT_SCHEME_TABLE: &[(&str, EasScheme)] = &[
    ("BE", EasScheme::BE_VAT),
    ("NL", EasScheme::NL_VAT),
    ("DE", EasScheme::DE_VAT),
];

/// Closed decision table for intermediary partners. Every unmatched case,
/// including an EAN of the wrong length, yields GLN (0088).
pub fn scheme_from_partner(partner: &PartnerId<'_>) -> &'static str {
    match partner.id_type {
        PartnerIdType::Ean if partner.identifier.trim().chars().count() == 13 => {
            EasScheme::GLN.code
        }
        PartnerIdType::Vat => {
            let country = partner.country.trim().to_ascii_uppercase();
            VAT_SCHEME_TABLE
                .iter()
                .find(|(c, _)| *c == country)
                .map(|(_, scheme)| scheme.code)
                .unwrap_or(DEFAULT_PARTNER_SCHEME)
        }
        _ => DEFAULT_PARTNER_SCHEME,
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_wins_over_fallback() {
        let ep = resolve_endpoint(Some("9925:BE0123456789"), Some("0208:1")).unwrap();
        assert_eq!(ep.scheme, "9925");
        assert_eq!(ep.value, "BE0123456789");
    }

    #[test]
    fn empty_extension_uses_fallback() {
        let ep = resolve_endpoint(Some(""), Some("0208:1234567890123")).unwrap();
        assert_eq!(ep.scheme, "0208");
        assert_eq!(ep.value, "1234567890123");
    }

    #[test]
    fn splits_on_first_colon_only() {
        let ep = resolve_endpoint(None, Some("0088:a:b")).unwrap();
        assert_eq!(ep.scheme, "0088");
        assert_eq!(ep.value, "a:b");
    }

    #[test]
    fn bare_value_gets_default_scheme() {
        let ep = resolve_endpoint(Some("0123456789"), None).unwrap();
        assert_eq!(ep.scheme, "");
        assert_eq!(ep.scheme_or("0208"), "0208");
        assert_eq!(ep.value, "0123456789");
    }

    #[test]
    fn nothing_resolvable() {
        assert_eq!(resolve_endpoint(None, None), None);
        assert_eq!(resolve_endpoint(Some(" "), Some("")), None);
        assert_eq!(resolve_endpoint(Some("0208:"), None), None);
    }

    #[test]
    fn vat_display_strips_only_be() {
        assert_eq!(resolve_vat_number("BE0123456789"), "0123456789");
        assert_eq!(resolve_vat_number("NL123456789B01"), "NL123456789B01");
        assert_eq!(resolve_vat_number("DE123456789"), "DE123456789");
        assert_eq!(resolve_vat_number("0123456789"), "0123456789");
    }

    fn partner<'a>(id_type: PartnerIdType, identifier: &'a str, country: &'a str) -> PartnerId<'a> {
        PartnerId {
            id_type,
            identifier,
            country,
        }
    }

    #[test]
    fn partner_decision_table() {
        use PartnerIdType::*;
        assert_eq!(scheme_from_partner(&partner(Ean, "5412345000013", "BE")), "0088");
        assert_eq!(scheme_from_partner(&partner(Vat, "BE0123456789", "BE")), "9925");
        assert_eq!(scheme_from_partner(&partner(Vat, "NL123456789B01", "nl")), "9944");
        assert_eq!(scheme_from_partner(&partner(Vat, "DE123456789", "DE")), "9930");
    }

    #[test]
    fn partner_defaults_to_gln() {
        use PartnerIdType::*;
        assert_eq!(scheme_from_partner(&partner(Ean, "541234500001", "BE")), "0088");
        assert_eq!(scheme_from_partner(&partner(Vat, "FR12345678901", "FR")), "0088");
        assert_eq!(scheme_from_partner(&partner(Other, "whatever", "BE")), "0088");
    }

    #[test]
    fn id_type_attr() {
        assert_eq!(PartnerIdType::from_attr(Some("ean")), PartnerIdType::Ean);
        assert_eq!(PartnerIdType::from_attr(Some("VAT")), PartnerIdType::Vat);
        assert_eq!(PartnerIdType::from_attr(None), PartnerIdType::Other);
    }
}
