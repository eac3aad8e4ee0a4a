//! Territory representation.

use std::collections::BTreeSet;

/// One territory on the board: a fixed symmetric neighbor set plus the
/// mutable owner and troop count.
///
/// The owner is stored by player name. Troops are at least 1 whenever an
/// owner is set; the owner is `None` only before the claim phase has
/// reached the territory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    pub name: String,
    pub neighbors: BTreeSet<String>,
    pub owner: Option<String>,
    pub troops: u32,
}

impl Territory {
    /// Creates an unclaimed territory with no troops.
    pub fn new(name: impl Into<String>, neighbors: BTreeSet<String>) -> Self {
        Territory {
            name: name.into(),
            neighbors,
            owner: None,
            troops: 0,
        }
    }

    /// Whether the named territory borders this one.
    pub fn is_neighbor(&self, name: &str) -> bool {
        self.neighbors.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn new_territory_is_unclaimed() {
        let terr = Territory::new("Alaska", neighbors(&["Alberta", "Kamchatka"]));
        assert_eq!(terr.owner, None);
        assert_eq!(terr.troops, 0);
    }

    #[test]
    fn neighbor_lookup() {
        let terr = Territory::new("Alaska", neighbors(&["Alberta", "Kamchatka"]));
        assert!(terr.is_neighbor("Kamchatka"));
        assert!(!terr.is_neighbor("Peru"));
    }
}
