//! The phase-tagged game state machine.
//!
//! A [`GameState`] is a tagged union with one variant per phase. Each
//! variant answers the same three questions: what actions are legal
//! ([`GameState::available_actions`]), what happens when one is applied
//! ([`GameState::transition`]), and whether the game is over
//! ([`GameState::is_terminal`]). Transitions consume the state and hand
//! back a fresh one so each board has exactly one owner at all times; a
//! rejected action returns the untouched state inside the error.

pub mod action;
mod attack;
mod fortify;
mod place;
pub mod player;
mod preassign;
mod preplace;

use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::board::{classic_board, Board, BoardError, MapError};
use crate::space::ActionSpace;

pub use action::Action;
pub use player::{Card, Player};

/// Initial per-player reinforcements for a given player count, per the
/// classic rules: 40 for two players, 5 fewer per extra player.
fn initial_reinforcements(player_count: usize) -> u32 {
    let count = player_count as i64;
    (40 - 5 * (count - 2)).max(0) as u32
}

/// The phase a state is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PrePlace,
    PreAssign,
    Place,
    Attack,
    Fortify,
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::PrePlace => "PrePlace",
            Phase::PreAssign => "PreAssign",
            Phase::Place => "Place",
            Phase::Attack => "Attack",
            Phase::Fortify => "Fortify",
            Phase::Terminal => "Terminal",
        };
        f.write_str(name)
    }
}

/// Errors raised by state construction and action validation.
///
/// Every variant is raised before any mutation, so a failed call leaves
/// the state exactly as it was.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("at least one player is needed")]
    NoPlayers,

    #[error("duplicate player name '{0}'")]
    DuplicatePlayer(String),

    #[error("unknown player '{0}'")]
    UnknownPlayer(String),

    #[error("a {phase} state cannot apply that action")]
    WrongAction { phase: Phase },

    #[error("'{0}' is already claimed")]
    AlreadyClaimed(String),

    #[error("'{territory}' is not owned by {player}")]
    NotOwned { territory: String, player: String },

    #[error("'{to}' does not neighbor '{from}'")]
    NotANeighbor { from: String, to: String },

    #[error("'{0}' belongs to the attacking player")]
    AttackOwnTerritory(String),

    #[error("territory and troop lists must be the same length")]
    MismatchedPlacement,

    #[error("placed {placed} troops but {reinforcements} reinforcements must be spent")]
    WrongPlacementTotal { placed: u64, reinforcements: u32 },

    #[error("every placement must assign at least one troop")]
    EmptyPlacement,

    #[error("an attack must commit between 2 and {available} troops, got {committed}")]
    AttackTroops { committed: u32, available: u32 },

    #[error("a fortify must move between 1 and {available} troops, got {moved}")]
    FortifyTroops { moved: u32, available: u32 },
}

/// A rejected transition: the reason plus the state, handed back
/// untouched so the caller can retry with a corrected action.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct TransitionError {
    pub state: GameState,
    #[source]
    pub kind: GameError,
}

/// The data every phase carries: the board, the remaining players in
/// turn order, the current player's index, and the running count of card
/// turn-ins (stored but otherwise unused).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) players: Vec<Player>,
    pub(crate) current: usize,
    pub(crate) card_turnins: u32,
}

impl Game {
    pub(crate) fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub(crate) fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current]
    }

    pub(crate) fn advance_player(&mut self) {
        self.current = (self.current + 1) % self.players.len();
    }

    /// Expected reinforcements for the named player at the start of
    /// their next turn: one per three owned territories plus continent
    /// bonuses, never below three.
    pub(crate) fn calculate_reinforcements(&self, player: &str) -> u32 {
        let territory_contrib = self.board.territories_owned(player).count() as u32 / 3;
        let continent_contrib: u32 = self.board.continents_owned(player).map(|c| c.bonus).sum();
        (territory_contrib + continent_contrib).max(3)
    }

    /// Whether the current player occupies the entire board.
    pub(crate) fn current_owns_everything(&self) -> bool {
        let name = self.current_player().name.as_str();
        self.board
            .territories()
            .all(|t| t.owner.as_deref() == Some(name))
    }
}

/// A game state tagged by phase.
///
/// Produced once by [`GameState::new_game`] and thereafter only by
/// [`GameState::transition`]. Cloning yields a fully independent deep
/// copy safe to hand to another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    PrePlace(Game),
    PreAssign(Game),
    Place(Game),
    Attack { game: Game, conquered: bool },
    Fortify(Game),
    Terminal(Game),
}

impl GameState {
    /// Starts a fresh game on the classic board. Players take turns in
    /// the order given; each starts with `40 - 5 * (count - 2)`
    /// reinforcements.
    pub fn new_game(names: &[&str]) -> Result<GameState, GameError> {
        Self::with_board(classic_board()?, names)
    }

    /// Starts a fresh game on a caller-supplied board.
    pub fn with_board(board: Board, names: &[&str]) -> Result<GameState, GameError> {
        if names.is_empty() {
            return Err(GameError::NoPlayers);
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(GameError::DuplicatePlayer(name.to_string()));
            }
        }
        let initial = initial_reinforcements(names.len());
        let players = names.iter().map(|n| Player::new(*n, initial)).collect();
        Ok(GameState::PrePlace(Game {
            board,
            players,
            current: 0,
            card_turnins: 0,
        }))
    }

    fn game(&self) -> &Game {
        match self {
            GameState::PrePlace(game)
            | GameState::PreAssign(game)
            | GameState::Place(game)
            | GameState::Attack { game, .. }
            | GameState::Fortify(game)
            | GameState::Terminal(game) => game,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            GameState::PrePlace(_) => Phase::PrePlace,
            GameState::PreAssign(_) => Phase::PreAssign,
            GameState::Place(_) => Phase::Place,
            GameState::Attack { .. } => Phase::Attack,
            GameState::Fortify(_) => Phase::Fortify,
            GameState::Terminal(_) => Phase::Terminal,
        }
    }

    pub fn board(&self) -> &Board {
        &self.game().board
    }

    /// The remaining players in turn order. Eliminated players are gone.
    pub fn players(&self) -> &[Player] {
        &self.game().players
    }

    pub fn current_player(&self) -> &Player {
        self.game().current_player()
    }

    /// The player next in line for a turn.
    pub fn next_player(&self) -> &Player {
        let game = self.game();
        &game.players[(game.current + 1) % game.players.len()]
    }

    /// Reinforcements currently held off-board by the named player.
    pub fn reinforcements(&self, player: &str) -> Result<u32, GameError> {
        self.game()
            .players
            .iter()
            .find(|p| p.name == player)
            .map(|p| p.reinforcements)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))
    }

    /// See [`Game::calculate_reinforcements`].
    pub fn calculate_reinforcements(&self, player: &str) -> u32 {
        self.game().calculate_reinforcements(player)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::Terminal(_))
    }

    /// The sole remaining player, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        match self {
            GameState::Terminal(game) => game.players.first(),
            _ => None,
        }
    }

    /// The set of legal actions from this state, as a countable,
    /// indexable, sample-able space.
    pub fn available_actions(&self) -> ActionSpace {
        match self {
            GameState::PrePlace(game) => preplace::actions(game),
            GameState::PreAssign(game) => preassign::actions(game),
            GameState::Place(game) => place::actions(game),
            GameState::Attack { game, .. } => attack::actions(game),
            GameState::Fortify(game) => fortify::actions(game),
            GameState::Terminal(_) => ActionSpace::empty(),
        }
    }

    /// Applies an action, consuming this state and producing the next
    /// one. The phase of the result may differ from the input. Dice and
    /// card draws come from `rng`.
    ///
    /// A rejected action performs no mutation; the error carries the
    /// original state back to the caller.
    pub fn transition(
        self,
        action: &Action,
        rng: &mut impl Rng,
    ) -> Result<GameState, Box<TransitionError>> {
        let result = match self {
            GameState::PrePlace(game) => preplace::apply(game, action),
            GameState::PreAssign(game) => preassign::apply(game, action),
            GameState::Place(game) => place::apply(game, action),
            GameState::Attack { game, conquered } => attack::apply(game, conquered, action, rng),
            GameState::Fortify(game) => fortify::apply(game, action),
            GameState::Terminal(game) => Err((
                GameState::Terminal(game),
                GameError::WrongAction { phase: Phase::Terminal },
            )),
        };
        result.map_err(|(state, kind)| Box::new(TransitionError { state, kind }))
    }
}
