//! Per-locality district rules
//!
//! A locality owns an ordered list of [`LocalityRule`]s and one mandatory
//! default district. Resolution walks the rules in declaration order and
//! the first rule whose predicate holds wins; overlapping areas are settled
//! by that order alone, never by area size.

use serde::{Deserialize, Serialize};

use super::types::{AreaPredicate, Coordinate, ZoningDistrict};
use crate::error::CatalogError;

/// One geographic rule mapped to a district record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityRule {
    /// Short label for the area ("downtown", "campus", ...)
    pub label: String,
    /// Area the rule covers
    pub area: AreaPredicate,
    /// District returned when the rule matches
    pub district: ZoningDistrict,
}

impl LocalityRule {
    /// Create a rule
    pub fn new(label: impl Into<String>, area: impl Into<AreaPredicate>, district: ZoningDistrict) -> Self {
        Self {
            label: label.into(),
            area: area.into(),
            district,
        }
    }

    /// Check whether the rule applies to the coordinate
    #[must_use]
    pub fn matches(&self, coord: Coordinate) -> bool {
        self.area.matches(coord)
    }
}

/// Ordered rules and default district for one locality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityRules {
    /// Locality name, referenced by the region's locality boundaries
    pub name: String,
    /// Rules in priority order
    #[serde(default)]
    pub rules: Vec<LocalityRule>,
    /// District used when no rule matches
    pub default: ZoningDistrict,
}

/// Outcome of rule evaluation within a locality
#[derive(Debug, Clone, Copy)]
pub enum RuleMatch<'a> {
    /// A rule matched
    Rule(&'a LocalityRule),
    /// No rule matched; the locality default applies
    Default(&'a ZoningDistrict),
}

impl<'a> RuleMatch<'a> {
    /// The selected district
    #[must_use]
    pub fn district(&self) -> &'a ZoningDistrict {
        match self {
            Self::Rule(rule) => &rule.district,
            Self::Default(district) => district,
        }
    }

    /// Label of the matched rule, `None` for the default
    #[must_use]
    pub fn label(&self) -> Option<&'a str> {
        match self {
            Self::Rule(rule) => Some(rule.label.as_str()),
            Self::Default(_) => None,
        }
    }
}

impl LocalityRules {
    /// Create a locality with no rules
    pub fn new(name: impl Into<String>, default: ZoningDistrict) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            default,
        }
    }

    /// Append a rule (lower priority than every rule added before it)
    #[must_use]
    pub fn with_rule(mut self, rule: LocalityRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Evaluate the rules, returning which rule (or the default) applied
    #[must_use]
    pub fn evaluate(&self, coord: Coordinate) -> RuleMatch<'_> {
        self.rules
            .iter()
            .find(|rule| rule.matches(coord))
            .map_or(RuleMatch::Default(&self.default), RuleMatch::Rule)
    }

    /// Resolve a coordinate to a district. Always returns a record.
    #[must_use]
    pub fn resolve(&self, coord: Coordinate) -> &ZoningDistrict {
        self.evaluate(coord).district()
    }

    /// Find a district by code among the rules and the default
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&ZoningDistrict> {
        self.rules
            .iter()
            .map(|rule| &rule.district)
            .chain(std::iter::once(&self.default))
            .find(|d| d.district == code)
    }

    /// Validate rule areas and district records
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on an empty name, an empty or malformed rule
    /// area, or an incomplete district record.
    pub fn validate(&self, region: &str) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName(format!("locality in region {region}")));
        }
        for rule in &self.rules {
            let context = format!("{region}/{} rule {}", self.name, rule.label);
            rule.area.validate(&context)?;
            rule.district.validate(&context)?;
        }
        self.default
            .validate(&format!("{region}/{} default", self.name))
    }
}
