//! Sample family documents
//!
//! Four hard-coded families plus a seedable generator of random ones.

use crate::domain::{Address, Child, Family, Parent, Pet, Result};
use fake::faker::internet::en::Username;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Genders assigned to generated children
pub const GENDERS: [&str; 2] = ["male", "female"];

/// Addresses generated families are placed at
pub fn address_pool() -> [Address; 5] {
    [
        Address::new("San Ramon", "King", "CA"),
        Address::new("Mountain View", "Greene", "CA"),
        Address::new("Austin", "Union", "TX"),
        Address::new("Austin", "Monroe", "TX"),
        Address::new("Seattle", "Jefferson", "WA"),
    ]
}

fn child(first_name: &str, family_name: &str, gender: &str, grade: u32, pets: &[&str]) -> Child {
    Child {
        first_name: first_name.to_string(),
        family_name: family_name.to_string(),
        gender: gender.to_string(),
        grade,
        pets: pets.iter().map(|p| Pet::new(*p)).collect(),
    }
}

/// The Andersen family
pub fn andersen() -> Result<Family> {
    Family::builder()
        .id("Andersen-1")
        .last_name("Andersen")
        .district("WA5")
        .parent(Parent::new("Thomas", "Andersen"))
        .parent(Parent::new("Mary Kay", "Andersen"))
        .child(child("Henriette Thaulow", "Andersen", "female", 5, &["Fluffy"]))
        .address(Address::new("Seattle", "King", "WA"))
        .registered(true)
        .build()
}

/// The Wakefield family
pub fn wakefield() -> Result<Family> {
    Family::builder()
        .id("Wakefield-7")
        .last_name("Wakefield")
        .district("NY23")
        .parent(Parent::new("Robin", "Wakefield"))
        .parent(Parent::new("Ben", "Miller"))
        .child(child("Jesse", "Wakefield", "female", 8, &["Goofy", "Shadow"]))
        .child(child("Lisa", "Miller", "female", 1, &[]))
        .address(Address::new("NY", "Manhattan", "NY"))
        .registered(false)
        .build()
}

/// The Johnson family
pub fn johnson() -> Result<Family> {
    Family::builder()
        .id("Johnson-1")
        .last_name("Johnson")
        .parent(Parent::new("John", "Johnson"))
        .child(child("Michael", "Johnson", "male", 4, &["Rex"]))
        .address(Address::new("Austin", "Union", "TX"))
        .registered(true)
        .build()
}

/// The Smith family
pub fn smith() -> Result<Family> {
    Family::builder()
        .id("Smith-1")
        .last_name("Smith")
        .parent(Parent::new("Jane", "Smith"))
        .parent(Parent::new("Ravi", "Smith"))
        .child(child("Noah", "Smith", "male", 2, &[]))
        .child(child("Ava", "Smith", "female", 6, &["Biscuit"]))
        .address(Address::new("Mountain View", "Greene", "CA"))
        .registered(false)
        .build()
}

/// Andersen, Wakefield, Johnson and Smith, in that order
pub fn canned_families() -> Result<Vec<Family>> {
    Ok(vec![andersen()?, wakefield()?, johnson()?, smith()?])
}

/// Generator of random families
///
/// Each family gets a random surname, an id of surname plus a UUID, two
/// parents, up to three children with up to three pets each and an address
/// from [`address_pool`]. The same seed yields the same families apart from
/// the UUID part of their ids.
pub struct FamilyGenerator {
    rng: StdRng,
    addresses: [Address; 5],
}

impl FamilyGenerator {
    /// Create a generator, seeded for reproducible output when `seed` is set
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            addresses: address_pool(),
        }
    }

    fn pet(&mut self) -> Pet {
        Pet::new(Username().fake_with_rng::<String, _>(&mut self.rng))
    }

    fn child(&mut self, last_name: &str) -> Child {
        let pet_count = self.rng.gen_range(0..4);
        let pets = (0..pet_count).map(|_| self.pet()).collect();
        Child {
            first_name: FirstName().fake_with_rng(&mut self.rng),
            family_name: last_name.to_string(),
            gender: GENDERS[self.rng.gen_range(0..GENDERS.len())].to_string(),
            grade: self.rng.gen_range(0..12),
            pets,
        }
    }

    /// Generate one family
    pub fn family(&mut self) -> Result<Family> {
        let last_name: String = LastName().fake_with_rng(&mut self.rng);
        let child_count = self.rng.gen_range(0..4);
        let children = (0..child_count).map(|_| self.child(&last_name)).collect();
        let address = self.addresses[self.rng.gen_range(0..self.addresses.len())].clone();
        let first: String = FirstName().fake_with_rng(&mut self.rng);
        let second: String = FirstName().fake_with_rng(&mut self.rng);

        Family::builder()
            .id(format!("{last_name}{}", Uuid::new_v4()))
            .last_name(last_name.as_str())
            .parent(Parent::new(first, last_name.as_str()))
            .parent(Parent::new(second, last_name.as_str()))
            .children(children)
            .address(address)
            .build()
    }

    /// Generate `count` families
    pub fn families(&mut self, count: usize) -> Result<Vec<Family>> {
        (0..count).map(|_| self.family()).collect()
    }
}

/// Generate `count` random families
pub fn generate_families(count: usize, seed: Option<u64>) -> Result<Vec<Family>> {
    FamilyGenerator::new(seed).families(count)
}
