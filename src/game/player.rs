//! Player representation.

use rand::Rng;

/// A territory card. Conquering at least one territory in a turn earns
/// one card of random kind. Trade-in mechanics are not implemented; the
/// hand only grows or changes hands on elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Infantry,
    Cavalry,
    Artillery,
}

impl Card {
    /// Draws a card of uniformly random kind.
    pub fn random(rng: &mut impl Rng) -> Card {
        match rng.gen_range(0..3) {
            0 => Card::Infantry,
            1 => Card::Cavalry,
            _ => Card::Artillery,
        }
    }
}

/// One player: a unique name, the troops held off-board, and a hand of
/// cards. Compared by all three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub reinforcements: u32,
    pub cards: Vec<Card>,
}

impl Player {
    pub fn new(name: impl Into<String>, reinforcements: u32) -> Self {
        Player {
            name: name.into(),
            reinforcements,
            cards: Vec::new(),
        }
    }
}
