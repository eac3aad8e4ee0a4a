//! Game driver and baseline agents.
//!
//! [`play_game`] loops one game to completion, asking each player's
//! [`Agent`] for an action in turn. [`play_games`] plays many games,
//! optionally in parallel with rayon, and tallies wins. Two baseline
//! agents are included: uniform-random play and a greedy stacking
//! heuristic.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::game::{Action, GameError, GameState, Phase};

/// Errors raised while driving a game to completion.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("no agent registered for player '{0}'")]
    UnknownAgent(String),

    #[error("agent for '{player}' produced no action in {phase}")]
    NoAction { player: String, phase: Phase },

    #[error("agent for '{player}' chose an illegal action at step {step}")]
    Rejected {
        player: String,
        step: usize,
        #[source]
        kind: GameError,
    },
}

/// A move-selection policy. Agents may keep state between calls; the
/// driver hands every call the game's RNG so a seeded run is fully
/// reproducible.
pub trait Agent {
    /// Picks an action for the current player, or `None` if the agent
    /// cannot choose (treated as a driver error, not a pass).
    fn choose(&mut self, state: &GameState, rng: &mut SmallRng) -> Option<Action>;
}

/// Plays a uniformly random legal action every turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAgent;

impl Agent for RandomAgent {
    fn choose(&mut self, state: &GameState, rng: &mut SmallRng) -> Option<Action> {
        let space = state.available_actions();
        space.sample(1, rng).ok().and_then(|mut picked| picked.pop())
    }
}

/// A greedy stacking heuristic: claim next to friends, pile every
/// reinforcement on the strongest frontline territory, attack from the
/// biggest stack once it exceeds five troops, and never fortify.
#[derive(Debug, Default, Clone, Copy)]
pub struct MassAgent;

impl MassAgent {
    /// The unowned territory with the most friendly neighbors.
    fn best_claim(state: &GameState) -> Option<String> {
        let player = state.current_player().name.as_str();
        let mut best: Option<(&str, usize)> = None;
        for terr in state.board().territories().filter(|t| t.owner.is_none()) {
            let friendly = terr
                .neighbors
                .iter()
                .filter(|n| matches!(state.board().owner(n), Ok(Some(owner)) if owner == player))
                .count();
            if best.map_or(true, |(_, count)| friendly > count) {
                best = Some((terr.name.as_str(), friendly));
            }
        }
        best.map(|(name, _)| name.to_string())
    }

    /// The owned territory with the most troops among those bordering
    /// territory the player does not hold.
    fn strongest_frontline(state: &GameState) -> Option<String> {
        let player = state.current_player().name.as_str();
        state
            .board()
            .territories_owned(player)
            .filter(|t| {
                t.neighbors
                    .iter()
                    .any(|n| !matches!(state.board().owner(n), Ok(Some(owner)) if owner == player))
            })
            .max_by_key(|t| t.troops)
            .map(|t| t.name.clone())
    }

    /// An all-in attack from the biggest stack over five troops, aimed
    /// at its toughest enemy neighbor.
    fn best_attack(state: &GameState) -> Option<Action> {
        let player = state.current_player().name.as_str();
        let board = state.board();
        let from = board
            .territories_owned(player)
            .filter(|t| t.troops > 5)
            .filter(|t| {
                t.neighbors
                    .iter()
                    .any(|n| !matches!(board.owner(n), Ok(Some(owner)) if owner == player))
            })
            .max_by_key(|t| t.troops)?;
        let to = from
            .neighbors
            .iter()
            .filter(|n| !matches!(board.owner(n), Ok(Some(owner)) if owner == player))
            .max_by_key(|n| board.troops(n).unwrap_or(0))?;
        Some(Action::Attack {
            from: from.name.clone(),
            to: (*to).clone(),
            troops: from.troops - 1,
        })
    }
}

impl Agent for MassAgent {
    fn choose(&mut self, state: &GameState, _rng: &mut SmallRng) -> Option<Action> {
        match state.phase() {
            Phase::PrePlace => Self::best_claim(state).map(|territory| Action::PrePlace { territory }),
            Phase::PreAssign => {
                Self::strongest_frontline(state).map(|territory| Action::PreAssign { territory })
            }
            Phase::Place => {
                let reinforcements = state.current_player().reinforcements;
                Self::strongest_frontline(state).map(|territory| Action::Place {
                    territories: vec![territory],
                    troops: vec![reinforcements],
                })
            }
            Phase::Attack => Some(Self::best_attack(state).unwrap_or(Action::DontAttack)),
            Phase::Fortify => Some(Action::DontFortify),
            Phase::Terminal => None,
        }
    }
}

/// Baseline agent selection, used by [`MatchConfig`] to build agents on
/// each worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Mass,
}

impl AgentKind {
    fn build(self) -> Box<dyn Agent + Send> {
        match self {
            AgentKind::Random => Box::new(RandomAgent),
            AgentKind::Mass => Box::new(MassAgent),
        }
    }
}

/// How one game ended: the winner's name, or `None` if the step cap was
/// hit first, plus the number of actions applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Option<String>,
    pub steps: usize,
}

/// Plays a single game to completion.
///
/// `agents` maps each player name to its policy; turn order follows the
/// map's iteration order. `max_steps` is a stalemate guard for agent
/// matchups that never finish.
pub fn play_game(
    agents: &mut BTreeMap<String, Box<dyn Agent + Send>>,
    max_steps: usize,
    rng: &mut SmallRng,
) -> Result<GameOutcome, DriverError> {
    let names: Vec<&str> = agents.keys().map(String::as_str).collect();
    let mut state = GameState::new_game(&names)?;

    for step in 0..max_steps {
        if state.is_terminal() {
            let winner = state.winner().map(|p| p.name.clone());
            return Ok(GameOutcome { winner, steps: step });
        }
        let player = state.current_player().name.clone();
        let phase = state.phase();
        let agent = agents
            .get_mut(&player)
            .ok_or_else(|| DriverError::UnknownAgent(player.clone()))?;
        let action = agent
            .choose(&state, rng)
            .ok_or_else(|| DriverError::NoAction {
                player: player.clone(),
                phase,
            })?;
        state = state.transition(&action, rng).map_err(|err| DriverError::Rejected {
            player,
            step,
            kind: err.kind,
        })?;
    }

    Ok(GameOutcome {
        winner: None,
        steps: max_steps,
    })
}

/// Configuration for a multi-game match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Player names and their agents, in turn order.
    pub players: Vec<(String, AgentKind)>,
    /// Number of games to play.
    pub games: usize,
    /// Worker threads; 1 plays sequentially.
    pub threads: usize,
    /// Base RNG seed; 0 seeds each game from entropy.
    pub seed: u64,
    /// Per-game action cap.
    pub max_steps: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            players: vec![
                ("Nate".to_string(), AgentKind::Random),
                ("Chris".to_string(), AgentKind::Random),
            ],
            games: 10,
            threads: 4,
            seed: 0,
            max_steps: 1_000_000,
        }
    }
}

/// Aggregated results of a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Games won, by player name.
    pub wins: BTreeMap<String, usize>,
    /// Games that hit the step cap.
    pub draws: usize,
}

impl MatchResult {
    fn record(&mut self, outcome: &GameOutcome) {
        match &outcome.winner {
            Some(name) => *self.wins.entry(name.clone()).or_insert(0) += 1,
            None => self.draws += 1,
        }
    }
}

fn game_rng(seed: u64, index: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(index as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn build_agents(config: &MatchConfig) -> BTreeMap<String, Box<dyn Agent + Send>> {
    config
        .players
        .iter()
        .map(|(name, kind)| (name.clone(), kind.build()))
        .collect()
}

/// Plays `config.games` independent games and tallies the outcomes.
///
/// With `config.threads > 1` the games run concurrently on a rayon
/// pool; each game draws its own RNG from the base seed so results are
/// reproducible regardless of scheduling.
pub fn play_games(config: &MatchConfig) -> Result<MatchResult, DriverError> {
    if config.threads > 1 {
        play_games_parallel(config)
    } else {
        play_games_sequential(config)
    }
}

fn play_games_sequential(config: &MatchConfig) -> Result<MatchResult, DriverError> {
    let mut agents = build_agents(config);
    let mut result = MatchResult::default();
    for i in 0..config.games {
        let mut rng = game_rng(config.seed, i);
        let outcome = play_game(&mut agents, config.max_steps, &mut rng)?;
        result.record(&outcome);
    }
    Ok(result)
}

fn play_games_parallel(config: &MatchConfig) -> Result<MatchResult, DriverError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .expect("failed to build rayon thread pool");

    let outcomes: Result<Vec<GameOutcome>, DriverError> = pool.install(|| {
        (0..config.games)
            .into_par_iter()
            .map(|i| {
                let mut agents = build_agents(config);
                let mut rng = game_rng(config.seed, i);
                play_game(&mut agents, config.max_steps, &mut rng)
            })
            .collect()
    });

    let mut result = MatchResult::default();
    for outcome in outcomes? {
        result.record(&outcome);
    }
    Ok(result)
}
