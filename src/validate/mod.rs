//! Validation of rendered documents.
//!
//! Conversion never calls a validator; callers run one or more [`Validator`]s
//! over the finished XML. External XSD, Schematron or remote services plug
//! in through the same trait. The crate ships one local implementation,
//! [`PeppolRulesValidator`].
//!
//! ```
//! use peppol_bridge::validate::{ValidationProfile, ValidatorRegistry};
//!
//! let registry = ValidatorRegistry::new();
//! let report = registry.validate_all("<Order/>", ValidationProfile::PeppolBis3, None);
//! assert!(!report.overall_success);
//! ```

mod peppol;

pub use peppol::PeppolRulesValidator;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ubl::{cii_ns, ubl_ns};

/// Rule set a document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationProfile {
    /// Peppol BIS Billing 3.0 (UBL).
    #[serde(rename = "peppol-bis3")]
    PeppolBis3,
    /// EN 16931 core rules on UBL syntax.
    #[serde(rename = "en16931-ubl")]
    En16931Ubl,
    /// EN 16931 core rules on CII syntax.
    #[serde(rename = "en16931-cii")]
    En16931Cii,
}

impl ValidationProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PeppolBis3 => "peppol-bis3",
            Self::En16931Ubl => "en16931-ubl",
            Self::En16931Cii => "en16931-cii",
        }
    }
}

impl fmt::Display for ValidationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peppol-bis3" => Ok(Self::PeppolBis3),
            "en16931-ubl" => Ok(Self::En16931Ubl),
            "en16931-cii" => Ok(Self::En16931Cii),
            other => Err(format!("unknown validation profile: {other}")),
        }
    }
}

/// Default profile for a document root namespace.
pub fn profile_for_namespace(ns: &str) -> Option<ValidationProfile> {
    match ns {
        ubl_ns::INVOICE | ubl_ns::CREDIT_NOTE => Some(ValidationProfile::PeppolBis3),
        cii_ns::RSM => Some(ValidationProfile::En16931Cii),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub rule_id: String,
    pub message: String,
    /// Element path of the offending node, when known.
    pub location: Option<String>,
    /// Name of the validator that reported it.
    pub source: Option<String>,
}

impl Issue {
    pub fn error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            rule_id: rule_id.into(),
            message: message.into(),
            location: None,
            source: None,
        }
    }

    pub fn warning(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule_id, message)
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Outcome of one validator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub validator_name: String,
    pub validator_type: String,
    pub profile: ValidationProfile,
    /// True when no issue has [`Severity::Error`].
    pub is_valid: bool,
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    /// Build a result from `issues`, stamping each with the validator name.
    pub fn from_issues(
        validator: &dyn Validator,
        profile: ValidationProfile,
        mut issues: Vec<Issue>,
    ) -> Self {
        for issue in &mut issues {
            issue.source.get_or_insert_with(|| validator.name().to_string());
        }
        Self {
            validator_name: validator.name().to_string(),
            validator_type: validator.validator_type().to_string(),
            profile,
            is_valid: !issues.iter().any(|i| i.severity == Severity::Error),
            issues,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// A document validator.
pub trait Validator: Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Registry key (`"peppol-rules"`, `"xsd"`, `"schematron"`, ...).
    fn validator_type(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// False for validators that call a remote service.
    fn is_local(&self) -> bool {
        true
    }

    fn supported_profiles(&self) -> &[ValidationProfile];

    /// Validate a complete XML document. Findings, including unparseable
    /// input, are reported as issues rather than errors.
    fn validate(&self, document: &str, profile: ValidationProfile) -> ValidationResult;
}

/// Metadata listed by [`ValidatorRegistry::list_validators`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorInfo {
    pub name: String,
    pub validator_type: String,
    pub description: String,
    pub is_local: bool,
    pub supported_profiles: Vec<ValidationProfile>,
}

/// One validator's report of a rule, as grouped by
/// [`MultiValidationResult::issues_by_rule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub validator: String,
    pub severity: Severity,
    pub message: String,
    pub location: Option<String>,
}

/// Combined results of several validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiValidationResult {
    pub results: Vec<ValidationResult>,
    pub overall_success: bool,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl MultiValidationResult {
    fn from_results(results: Vec<ValidationResult>) -> Self {
        let total_errors = results.iter().map(|r| r.errors().count()).sum();
        let total_warnings = results.iter().map(|r| r.warnings().count()).sum();
        Self {
            overall_success: !results.is_empty() && results.iter().all(|r| r.is_valid),
            total_errors,
            total_warnings,
            results,
        }
    }

    /// Issues keyed by rule ID, to see which validators agree.
    pub fn issues_by_rule(&self) -> BTreeMap<&str, Vec<RuleHit>> {
        let mut map: BTreeMap<&str, Vec<RuleHit>> = BTreeMap::new();
        for result in &self.results {
            for issue in &result.issues {
                map.entry(issue.rule_id.as_str()).or_default().push(RuleHit {
                    validator: result.validator_name.clone(),
                    severity: issue.severity,
                    message: issue.message.clone(),
                    location: issue.location.clone(),
                });
            }
        }
        map
    }
}

/// Validators keyed by [`Validator::validator_type`].
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn Validator>>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorRegistry {
    /// A registry with the built-in validators.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(PeppolRulesValidator::new());
        registry
    }

    pub fn empty() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Add a validator. One registered under the same type is replaced.
    pub fn register(&mut self, validator: impl Validator + 'static) {
        let key = validator.validator_type().to_string();
        self.validators.retain(|v| v.validator_type() != key);
        self.validators.push(Box::new(validator));
    }

    pub fn get(&self, validator_type: &str) -> Option<&dyn Validator> {
        self.validators
            .iter()
            .find(|v| v.validator_type() == validator_type)
            .map(|v| v.as_ref())
    }

    pub fn list_validators(&self) -> Vec<ValidatorInfo> {
        self.validators
            .iter()
            .map(|v| ValidatorInfo {
                name: v.name().to_string(),
                validator_type: v.validator_type().to_string(),
                description: v.description().to_string(),
                is_local: v.is_local(),
                supported_profiles: v.supported_profiles().to_vec(),
            })
            .collect()
    }

    pub fn local_validators(&self) -> impl Iterator<Item = &dyn Validator> {
        self.validators
            .iter()
            .filter(|v| v.is_local())
            .map(|v| v.as_ref())
    }

    /// Run the selected validators (all when `types` is `None`). Local
    /// validators run before remote ones. Unknown types are skipped; if
    /// nothing is selected the combined result is unsuccessful.
    pub fn validate_all(
        &self,
        document: &str,
        profile: ValidationProfile,
        types: Option<&[&str]>,
    ) -> MultiValidationResult {
        let selected: Vec<&dyn Validator> = self
            .validators
            .iter()
            .map(|v| v.as_ref())
            .filter(|v| types.is_none_or(|t| t.iter().any(|ty| *ty == v.validator_type())))
            .collect();

        let (local, remote): (Vec<_>, Vec<_>) = selected.into_iter().partition(|v| v.is_local());
        let results = local
            .into_iter()
            .chain(remote)
            .map(|v| {
                let result = v.validate(document, profile);
                tracing::debug!(
                    validator = v.validator_type(),
                    valid = result.is_valid,
                    issues = result.issues.len(),
                    "validator finished"
                );
                result
            })
            .collect();

        MultiValidationResult::from_results(results)
    }
}
