//! Continent representation.

use std::collections::BTreeSet;

/// A named group of territories worth a reinforcement bonus when one
/// player holds every member.
///
/// Ownership is never stored here; the board derives it from territory
/// owners on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continent {
    pub name: String,
    pub bonus: u32,
    pub territories: BTreeSet<String>,
}

impl Continent {
    pub fn new(name: impl Into<String>, bonus: u32, territories: BTreeSet<String>) -> Self {
        Continent {
            name: name.into(),
            bonus,
            territories,
        }
    }
}
