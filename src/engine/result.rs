use serde::Serialize;

use super::finding::{Finding, Severity};

/// Outcome of one or more checks. Valid iff there are no errors; warnings
/// never affect validity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// File a finding under errors or warnings according to its severity.
    pub fn push(&mut self, finding: Finding) {
        match finding.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    /// Append another result's findings, keeping their order.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Human-readable view: `{is_valid, errors: [..], warnings: [..]}`.
    pub fn rendered(&self) -> RenderedResult {
        RenderedResult {
            is_valid: self.is_valid(),
            errors: self.error_messages(),
            warnings: self.warning_messages(),
        }
    }

    /// Machine-readable view with tagged findings.
    pub fn structured(&self) -> StructuredResult<'_> {
        StructuredResult {
            is_valid: self.is_valid(),
            errors: &self.errors,
            warnings: &self.warnings,
        }
    }
}

impl FromIterator<Finding> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        let mut result = Self::new();
        for finding in iter {
            result.push(finding);
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredResult<'a> {
    pub is_valid: bool,
    pub errors: &'a [Finding],
    pub warnings: &'a [Finding],
}
