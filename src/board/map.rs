//! Map loading.
//!
//! Builds a [`Board`] from two JSON files: a territory adjacency map
//! (`name -> [neighbor, ...]`, symmetry is a data precondition and not
//! enforced here) and a continent list (`[{name, bonus, territories}]`).
//! The classic 42-territory map ships embedded in the binary.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::continent::Continent;
use super::state::Board;
use super::territory::Territory;

const CLASSIC_TERRITORIES: &str = include_str!("../../data/territories.json");
const CLASSIC_CONTINENTS: &str = include_str!("../../data/continents.json");

/// Errors that can occur while loading a map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("continent '{continent}' references unknown territory '{territory}'")]
    UnknownTerritory { continent: String, territory: String },
}

/// On-disk shape of one continent entry.
#[derive(Debug, Deserialize)]
struct ContinentSpec {
    name: String,
    bonus: u32,
    territories: Vec<String>,
}

/// Parses a board from the contents of the two map files.
pub fn parse_board(territories_json: &str, continents_json: &str) -> Result<Board, MapError> {
    let adjacency: BTreeMap<String, Vec<String>> = serde_json::from_str(territories_json)?;
    let territories: BTreeMap<String, Territory> = adjacency
        .into_iter()
        .map(|(name, neighbors)| {
            let terr = Territory::new(name.clone(), neighbors.into_iter().collect());
            (name, terr)
        })
        .collect();

    let specs: Vec<ContinentSpec> = serde_json::from_str(continents_json)?;
    let mut continents = BTreeMap::new();
    for spec in specs {
        for terr in &spec.territories {
            if !territories.contains_key(terr) {
                return Err(MapError::UnknownTerritory {
                    continent: spec.name,
                    territory: terr.clone(),
                });
            }
        }
        let members = spec.territories.into_iter().collect();
        continents.insert(spec.name.clone(), Continent::new(spec.name, spec.bonus, members));
    }

    Ok(Board::new(territories, continents))
}

/// Loads a board from two map files on disk.
pub fn load_board(
    territories_path: impl AsRef<Path>,
    continents_path: impl AsRef<Path>,
) -> Result<Board, MapError> {
    let territories_json = fs::read_to_string(territories_path)?;
    let continents_json = fs::read_to_string(continents_path)?;
    parse_board(&territories_json, &continents_json)
}

/// The classic 42-territory, 6-continent board.
pub fn classic_board() -> Result<Board, MapError> {
    parse_board(CLASSIC_TERRITORIES, CLASSIC_CONTINENTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_board_shape() {
        let board = classic_board().unwrap();
        assert_eq!(board.territory_count(), 42);
        assert_eq!(board.continents().count(), 6);
        let asia = board.continents().find(|c| c.name == "Asia").unwrap();
        assert_eq!(asia.bonus, 7);
        assert_eq!(asia.territories.len(), 12);
    }

    #[test]
    fn classic_adjacency_is_symmetric() {
        let board = classic_board().unwrap();
        for terr in board.territories() {
            for neighbor in &terr.neighbors {
                let back = board.territory(neighbor).unwrap();
                assert!(
                    back.is_neighbor(&terr.name),
                    "{} -> {} is one-directional",
                    terr.name,
                    neighbor
                );
            }
        }
    }

    #[test]
    fn classic_continents_partition_the_board() {
        let board = classic_board().unwrap();
        let covered: usize = board.continents().map(|c| c.territories.len()).sum();
        assert_eq!(covered, 42);
    }

    #[test]
    fn unknown_territory_in_continent_is_fatal() {
        let territories = r#"{"A": ["B"], "B": ["A"]}"#;
        let continents = r#"[{"name": "X", "bonus": 1, "territories": ["A", "Zed"]}]"#;
        let err = parse_board(territories, continents).unwrap_err();
        assert!(matches!(
            err,
            MapError::UnknownTerritory { ref continent, ref territory }
                if continent == "X" && territory == "Zed"
        ));
    }

    #[test]
    fn malformed_json_is_fatal() {
        assert!(matches!(parse_board("not json", "[]"), Err(MapError::Parse(_))));
    }
}
