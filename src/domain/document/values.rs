//! Value objects carried by a document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

// ════════════════════════════════════════════════════════════════════════════════
// VersionNumber
// ════════════════════════════════════════════════════════════════════════════════

/// Document version, ordered by (major, minor) and written as `"major.minor"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber {
    major: u32,
    minor: u32,
}

impl VersionNumber {
    /// The version of a document that has never been submitted.
    pub const INITIAL: VersionNumber = VersionNumber { major: 0, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::INITIAL
    }

    /// Parses an optional stored value; absent or blank means `0.0`.
    pub fn parse_or_initial(raw: Option<&str>) -> Result<Self, ValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::INITIAL),
            Some(text) => text.parse(),
        }
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            ValidationError::invalid_format(
                "version_number",
                format!("expected 'major.minor' with numeric parts, got '{}'", s),
            )
        };

        let (major, minor) = s.trim().split_once('.').ok_or_else(malformed)?;
        let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(major) || !is_digits(minor) {
            return Err(malformed());
        }

        Ok(Self {
            major: major.parse().map_err(|_| malformed())?,
            minor: minor.parse().map_err(|_| malformed())?,
        })
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// ChangeClass
// ════════════════════════════════════════════════════════════════════════════════

/// How large a change a submission or revision represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClass {
    #[default]
    None,
    Minor,
    Major,
}

impl ChangeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeClass::None => "none",
            ChangeClass::Minor => "minor",
            ChangeClass::Major => "major",
        }
    }
}

impl fmt::Display for ChangeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ChangeClass::None),
            "minor" => Ok(ChangeClass::Minor),
            "major" => Ok(ChangeClass::Major),
            other => Err(ValidationError::invalid_format(
                "change_class",
                format!("expected none, minor or major, got '{}'", other),
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════════

/// Taxonomy terms attached to a document, keyed by taxonomy name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classification(BTreeMap<String, BTreeSet<String>>);

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: attach a term under a taxonomy.
    pub fn with_term(mut self, taxonomy: impl Into<String>, term: impl Into<String>) -> Self {
        self.add_term(taxonomy, term);
        self
    }

    pub fn add_term(&mut self, taxonomy: impl Into<String>, term: impl Into<String>) {
        self.0.entry(taxonomy.into()).or_default().insert(term.into());
    }

    pub fn terms(&self, taxonomy: &str) -> Option<&BTreeSet<String>> {
        self.0.get(taxonomy)
    }

    pub fn taxonomies(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
