//! Sample queries
//!
//! Each query the samples issue is modelled as a [`FamilyQuery`], which renders
//! the SQL text sent to Cosmos DB and can also be evaluated against a single
//! [`Family`] so that backends without a SQL engine can answer it.

use super::errors::SampleError;
use super::family::Family;
use super::result::Result;
use std::fmt;
use std::str::FromStr;

/// Surnames selected by the default query
pub const DEFAULT_LAST_NAMES: [&str; 3] = ["Andersen", "Wakefield", "Johnson"];

/// Result ordering requested by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrder {
    /// Service-defined order
    Unordered,
    /// Most recently written documents first (`ORDER BY _ts DESC`)
    NewestFirst,
}

/// A query over the family container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyQuery {
    /// `lastName IN (...)`
    LastNameIn(Vec<String>),

    /// `lastName != ...`
    LastNameNot(String),

    /// Families without a district that have at least one son, newest first
    UndistrictedWithSons,

    /// Free SQL text, only executable by the service
    Custom(String),
}

impl Default for FamilyQuery {
    fn default() -> Self {
        FamilyQuery::LastNameIn(DEFAULT_LAST_NAMES.iter().map(|s| s.to_string()).collect())
    }
}

impl FamilyQuery {
    /// Resolves a query by its CLI/config name
    ///
    /// `custom` requires the SQL text to be supplied.
    pub fn from_name(name: &str, custom_sql: Option<&str>) -> Result<Self> {
        match name {
            "custom" => match custom_sql.map(str::trim) {
                Some(sql) if !sql.is_empty() => Ok(FamilyQuery::Custom(sql.to_string())),
                _ => Err(SampleError::Configuration(
                    "query 'custom' requires demo.custom_query to be set".to_string(),
                )),
            },
            other => other.parse(),
        }
    }

    /// Short name of the query
    pub fn name(&self) -> &'static str {
        match self {
            FamilyQuery::LastNameIn(_) => "last-name-in",
            FamilyQuery::LastNameNot(_) => "not-andersen",
            FamilyQuery::UndistrictedWithSons => "undistricted-with-sons",
            FamilyQuery::Custom(_) => "custom",
        }
    }

    /// Renders the SQL text sent to the service
    pub fn to_sql(&self) -> String {
        match self {
            FamilyQuery::LastNameIn(names) => {
                let list = names
                    .iter()
                    .map(|n| quote_literal(n))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("SELECT * FROM Family WHERE Family.lastName IN ({list})")
            }
            FamilyQuery::LastNameNot(name) => format!(
                "SELECT * FROM Family WHERE Family.lastName != {}",
                quote_literal(name)
            ),
            FamilyQuery::UndistrictedWithSons => concat!(
                "SELECT VALUE root.f FROM (",
                "SELECT DISTINCT f FROM f ",
                "JOIN (SELECT DISTINCT VALUE c FROM c IN f.children WHERE c.gender = 'male') ",
                "WHERE f.district = null",
                ") AS root ORDER BY root.f._ts DESC"
            )
            .to_string(),
            FamilyQuery::Custom(sql) => sql.clone(),
        }
    }

    /// Evaluates the query predicate against one family
    ///
    /// Returns `None` for [`FamilyQuery::Custom`], which has no local evaluation.
    pub fn matches(&self, family: &Family) -> Option<bool> {
        match self {
            FamilyQuery::LastNameIn(names) => Some(names.iter().any(|n| *n == family.last_name)),
            FamilyQuery::LastNameNot(name) => Some(family.last_name != *name),
            FamilyQuery::UndistrictedWithSons => {
                Some(family.district.is_none() && family.has_son())
            }
            FamilyQuery::Custom(_) => None,
        }
    }

    /// Ordering requested by the query
    pub fn order(&self) -> QueryOrder {
        match self {
            FamilyQuery::UndistrictedWithSons => QueryOrder::NewestFirst,
            _ => QueryOrder::Unordered,
        }
    }
}

impl FromStr for FamilyQuery {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last-name-in" => Ok(FamilyQuery::default()),
            "not-andersen" => Ok(FamilyQuery::LastNameNot("Andersen".to_string())),
            "undistricted-with-sons" => Ok(FamilyQuery::UndistrictedWithSons),
            other => Err(SampleError::Configuration(format!(
                "Unknown query '{other}'. Must be one of: last-name-in, not-andersen, undistricted-with-sons, custom"
            ))),
        }
    }
}

impl fmt::Display for FamilyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

/// Quotes a string literal, doubling embedded single quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
