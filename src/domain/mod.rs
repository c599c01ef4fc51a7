//! Domain models and types for the samples.
//!
//! The domain layer provides:
//! - **Documents** ([`Family`], [`Parent`], [`Child`], [`Pet`], [`Address`])
//! - **Queries** ([`FamilyQuery`]) rendered to SQL or evaluated locally
//! - **Error types** ([`SampleError`], [`CosmosDbError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use cosmos_family::domain::{Address, Family, Parent};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let family = Family::builder()
//!     .id("Andersen.1")
//!     .last_name("Andersen")
//!     .parent(Parent::new("Thomas", "Andersen"))
//!     .address(Address::new("Seattle", "King", "WA"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod family;
pub mod query;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{CosmosDbError, SampleError};
pub use family::{Address, Child, Family, FamilyBuilder, Parent, Pet};
pub use query::{FamilyQuery, QueryOrder};
pub use result::Result;
