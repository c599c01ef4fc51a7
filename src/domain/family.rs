//! Family document model
//!
//! The sample payloads stored in the container. Field names serialize in
//! camelCase because the sample queries reference `lastName`, `district`,
//! `children` and `gender`.

use super::errors::SampleError;
use super::result::Result;
use serde::{Deserialize, Serialize};

/// A family document, partitioned by surname
///
/// # Examples
///
/// ```
/// use cosmos_family::domain::family::{Address, Family};
///
/// let family = Family::builder()
///     .id("Andersen-1")
///     .last_name("Andersen")
///     .address(Address::new("Seattle", "King", "WA"))
///     .build()
///     .unwrap();
/// assert_eq!(family.partition_key_value("/lastName"), Some("Andersen"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    /// Document id
    pub id: String,

    /// Surname, used as the partition key
    pub last_name: String,

    /// School district, absent for some families
    #[serde(default)]
    pub district: Option<String>,

    #[serde(default)]
    pub parents: Vec<Parent>,

    #[serde(default)]
    pub children: Vec<Child>,

    pub address: Address,

    #[serde(default)]
    pub is_registered: bool,
}

impl Family {
    /// Creates a new builder for constructing a Family
    pub fn builder() -> FamilyBuilder {
        FamilyBuilder::default()
    }

    /// Resolves the value stored under a partition key path such as `/lastName`
    ///
    /// Only the top-level string paths a family can be partitioned by are
    /// supported: `/id` and `/lastName` (plus `/district` when present).
    pub fn partition_key_value(&self, path: &str) -> Option<&str> {
        match path.trim_start_matches('/') {
            "id" => Some(self.id.as_str()),
            "lastName" => Some(self.last_name.as_str()),
            "district" => self.district.as_deref(),
            _ => None,
        }
    }

    /// True when at least one child is recorded as male
    pub fn has_son(&self) -> bool {
        self.children.iter().any(|c| c.gender == "male")
    }

    /// Validates the fields every operation depends on
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SampleError::Validation(
                "Family id cannot be empty".to_string(),
            ));
        }
        if self.last_name.trim().is_empty() {
            return Err(SampleError::Validation(format!(
                "Family {} has an empty lastName",
                self.id
            )));
        }
        Ok(())
    }
}

/// A parent of the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub first_name: String,
    pub family_name: String,
}

impl Parent {
    pub fn new(first_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            family_name: family_name.into(),
        }
    }
}

/// A child of the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub first_name: String,
    pub family_name: String,
    pub gender: String,
    pub grade: u32,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

/// A pet owned by a child
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub given_name: String,
}

impl Pet {
    pub fn new(given_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
        }
    }
}

/// Home address of the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    pub county: String,
    pub state: String,
}

impl Address {
    pub fn new(
        city: impl Into<String>,
        county: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            county: county.into(),
            state: state.into(),
        }
    }
}

/// Builder for constructing Family instances
#[derive(Debug, Default)]
pub struct FamilyBuilder {
    id: Option<String>,
    last_name: Option<String>,
    district: Option<String>,
    parents: Vec<Parent>,
    children: Vec<Child>,
    address: Option<Address>,
    is_registered: bool,
}

impl FamilyBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn parent(mut self, parent: Parent) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn child(mut self, child: Child) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<Child>) -> Self {
        self.children = children;
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn registered(mut self, is_registered: bool) -> Self {
        self.is_registered = is_registered;
        self
    }

    /// Builds the Family
    ///
    /// # Errors
    ///
    /// Returns an error if `id`, `last_name` or `address` is missing, or if
    /// `id`/`last_name` is blank.
    pub fn build(self) -> Result<Family> {
        let family = Family {
            id: self
                .id
                .ok_or_else(|| SampleError::Validation("Family id is required".to_string()))?,
            last_name: self.last_name.ok_or_else(|| {
                SampleError::Validation("Family lastName is required".to_string())
            })?,
            district: self.district,
            parents: self.parents,
            children: self.children,
            address: self.address.ok_or_else(|| {
                SampleError::Validation("Family address is required".to_string())
            })?,
            is_registered: self.is_registered,
        };
        family.validate()?;
        Ok(family)
    }
}
