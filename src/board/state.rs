//! The board: territories and continents for one game instance.
//!
//! Owned exclusively by one game state at a time. Queries are pure;
//! the two mutators are crate-private and only reachable from phase
//! transitions, which validate names before calling them.

use std::collections::BTreeMap;

use thiserror::Error;

use super::continent::Continent;
use super::territory::Territory;

/// Errors raised by board lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("unknown territory '{0}'")]
    UnknownTerritory(String),
}

/// The full collection of territories and continents, keyed by name.
///
/// Backed by `BTreeMap` so iteration order is deterministic, though
/// callers must not rely on it being sorted; anyone needing a specific
/// order sorts explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    territories: BTreeMap<String, Territory>,
    continents: BTreeMap<String, Continent>,
}

impl Board {
    pub fn new(
        territories: BTreeMap<String, Territory>,
        continents: BTreeMap<String, Continent>,
    ) -> Self {
        Board {
            territories,
            continents,
        }
    }

    /// Looks up a territory by name.
    pub fn territory(&self, name: &str) -> Result<&Territory, BoardError> {
        self.territories
            .get(name)
            .ok_or_else(|| BoardError::UnknownTerritory(name.to_string()))
    }

    /// Number of troops occupying the named territory.
    pub fn troops(&self, name: &str) -> Result<u32, BoardError> {
        Ok(self.territory(name)?.troops)
    }

    /// Name of the player occupying the named territory, if any.
    pub fn owner(&self, name: &str) -> Result<Option<&str>, BoardError> {
        Ok(self.territory(name)?.owner.as_deref())
    }

    /// The fixed neighbor set of the named territory.
    pub fn neighbors(&self, name: &str) -> Result<impl Iterator<Item = &str>, BoardError> {
        Ok(self.territory(name)?.neighbors.iter().map(String::as_str))
    }

    /// All territories in board iteration order.
    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    /// All continents in board iteration order.
    pub fn continents(&self) -> impl Iterator<Item = &Continent> {
        self.continents.values()
    }

    /// Territories owned by the named player, in board iteration order.
    pub fn territories_owned<'a>(
        &'a self,
        player: &'a str,
    ) -> impl Iterator<Item = &'a Territory> + 'a {
        self.territories
            .values()
            .filter(move |t| t.owner.as_deref() == Some(player))
    }

    /// Continents whose every member territory is owned by the named
    /// player. A continent with any unclaimed member is owned by no one.
    pub fn continents_owned<'a>(
        &'a self,
        player: &'a str,
    ) -> impl Iterator<Item = &'a Continent> + 'a {
        self.continents.values().filter(move |c| {
            c.territories.iter().all(|name| {
                self.territories
                    .get(name)
                    .is_some_and(|t| t.owner.as_deref() == Some(player))
            })
        })
    }

    /// Assigns the named territory to a player. The name must have been
    /// validated by the calling transition.
    pub(crate) fn set_owner(&mut self, name: &str, player: &str) {
        if let Some(terr) = self.territories.get_mut(name) {
            terr.owner = Some(player.to_string());
        }
    }

    /// Adjusts the troop count of the named territory. Callers must have
    /// checked that the count cannot go below zero.
    pub(crate) fn add_troops(&mut self, name: &str, delta: i64) {
        if let Some(terr) = self.territories.get_mut(name) {
            let updated = i64::from(terr.troops) + delta;
            debug_assert!(updated >= 0, "troops at {} driven below zero", name);
            terr.troops = updated.max(0) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn small_board() -> Board {
        let adjacency = [
            ("A", vec!["B", "C"]),
            ("B", vec!["A", "C"]),
            ("C", vec!["A", "B"]),
            ("D", vec![]),
        ];
        let territories: BTreeMap<String, Territory> = adjacency
            .into_iter()
            .map(|(name, neighbors)| {
                let set: BTreeSet<String> = neighbors.into_iter().map(String::from).collect();
                (name.to_string(), Territory::new(name, set))
            })
            .collect();
        let mut continents = BTreeMap::new();
        continents.insert(
            "West".to_string(),
            Continent::new(
                "West",
                3,
                ["A", "B"].iter().map(|s| s.to_string()).collect(),
            ),
        );
        continents.insert(
            "East".to_string(),
            Continent::new(
                "East",
                2,
                ["C", "D"].iter().map(|s| s.to_string()).collect(),
            ),
        );
        Board::new(territories, continents)
    }

    #[test]
    fn lookups_on_unknown_territory_fail() {
        let board = small_board();
        assert_eq!(
            board.troops("Nowhere"),
            Err(BoardError::UnknownTerritory("Nowhere".to_string()))
        );
        assert!(board.owner("Nowhere").is_err());
        assert!(board.neighbors("Nowhere").is_err());
    }

    #[test]
    fn ownership_and_troops() {
        let mut board = small_board();
        board.set_owner("A", "red");
        board.add_troops("A", 5);
        assert_eq!(board.owner("A").unwrap(), Some("red"));
        assert_eq!(board.troops("A").unwrap(), 5);
        board.add_troops("A", -2);
        assert_eq!(board.troops("A").unwrap(), 3);
    }

    #[test]
    fn territories_owned_filters_by_player() {
        let mut board = small_board();
        board.set_owner("A", "red");
        board.set_owner("B", "blue");
        board.set_owner("C", "red");
        let owned: Vec<&str> = board.territories_owned("red").map(|t| t.name.as_str()).collect();
        assert_eq!(owned, vec!["A", "C"]);
        assert_eq!(board.territories_owned("green").count(), 0);
    }

    #[test]
    fn continent_owned_requires_every_member() {
        let mut board = small_board();
        board.set_owner("A", "red");
        assert_eq!(board.continents_owned("red").count(), 0);
        board.set_owner("B", "red");
        let owned: Vec<&str> = board.continents_owned("red").map(|c| c.name.as_str()).collect();
        assert_eq!(owned, vec!["West"]);
    }

    #[test]
    fn unclaimed_member_blocks_continent_ownership() {
        let mut board = small_board();
        board.set_owner("C", "red");
        // D is unclaimed, so East is owned by no one.
        assert_eq!(board.continents_owned("red").count(), 0);
    }
}
