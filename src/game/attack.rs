//! The attack phase.
//!
//! The current player launches any number of attacks against enemy
//! neighbors, then stops voluntarily. Each attack is one combat round:
//! the attacker rolls one die per committed troop beyond the one left
//! to hold ground, the defender rolls one per defending troop, the dice
//! are paired off highest against highest, and the defender loses the
//! pairing only when strictly outrolled. Conquests transfer ownership,
//! eliminations fold the loser's cards into the attacker's hand, and a
//! player holding the whole board ends the game.

use rand::Rng;

use crate::space::ActionSpace;

use super::{Action, Card, Game, GameError, GameState, Phase};

/// Every (owned, enemy neighbor, committed troops) triple, plus the
/// option to stop. Committing `t` troops requires `t + 1` on the source
/// so one stays behind.
pub(super) fn actions(game: &Game) -> ActionSpace {
    let player = game.current_player().name.as_str();
    let mut attacks = Vec::new();
    for terr in game.board.territories_owned(player) {
        for neighbor in &terr.neighbors {
            let enemy = !matches!(game.board.owner(neighbor), Ok(Some(owner)) if owner == player);
            if enemy {
                for troops in 2..terr.troops {
                    attacks.push(Action::Attack {
                        from: terr.name.clone(),
                        to: neighbor.clone(),
                        troops,
                    });
                }
            }
        }
    }
    attacks.push(Action::DontAttack);
    ActionSpace::from_actions(attacks)
}

/// Rolls `count` six-sided dice.
fn roll(rng: &mut impl Rng, count: u32) -> Vec<u8> {
    (0..count).map(|_| rng.gen_range(1..=6)).collect()
}

/// Resolves one combat round. Both sides' dice are sorted descending and
/// paired off; the defender loses a troop only when the attacker's die
/// is strictly higher, otherwise the attacker loses one. Unpaired dice
/// are ignored. Returns (attacker losses, defender losses).
fn resolve_round(mut attacker: Vec<u8>, mut defender: Vec<u8>) -> (u32, u32) {
    attacker.sort_unstable_by(|a, b| b.cmp(a));
    defender.sort_unstable_by(|a, b| b.cmp(a));
    let mut attacker_losses = 0;
    let mut defender_losses = 0;
    for (att, def) in attacker.iter().zip(&defender) {
        if att > def {
            defender_losses += 1;
        } else {
            attacker_losses += 1;
        }
    }
    (attacker_losses, defender_losses)
}

/// Ends the game in favor of the current player.
fn win(mut game: Game) -> GameState {
    let winner = game.current_player().clone();
    game.players = vec![winner];
    game.current = 0;
    GameState::Terminal(game)
}

pub(super) fn apply(
    mut game: Game,
    conquered: bool,
    action: &Action,
    rng: &mut impl Rng,
) -> Result<GameState, (GameState, GameError)> {
    let (from, to, committed) = match action {
        Action::Attack { from, to, troops } => (from, to, *troops),
        Action::DontAttack => {
            if conquered {
                let card = Card::random(rng);
                game.current_player_mut().cards.push(card);
            }
            if game.current_owns_everything() {
                return Ok(win(game));
            }
            return Ok(GameState::Fortify(game));
        }
        _ => {
            return Err((
                GameState::Attack { game, conquered },
                GameError::WrongAction { phase: Phase::Attack },
            ))
        }
    };

    let player = game.current_player().name.clone();
    macro_rules! reject {
        ($kind:expr) => {
            return Err((GameState::Attack { game, conquered }, $kind))
        };
    }

    let source = match game.board.territory(from) {
        Ok(terr) => terr,
        Err(err) => reject!(err.into()),
    };
    if source.owner.as_deref() != Some(player.as_str()) {
        reject!(GameError::NotOwned { territory: from.clone(), player });
    }
    if !source.is_neighbor(to) {
        reject!(GameError::NotANeighbor { from: from.clone(), to: to.clone() });
    }
    let available = source.troops;
    let defending = match game.board.territory(to) {
        Ok(terr) => terr,
        Err(err) => reject!(err.into()),
    };
    if defending.owner.as_deref() == Some(player.as_str()) {
        reject!(GameError::AttackOwnTerritory(to.clone()));
    }
    let defender = defending.owner.clone();
    let defender_troops = defending.troops;
    if committed < 2 || committed >= available {
        reject!(GameError::AttackTroops { committed, available: available.saturating_sub(1) });
    }

    let (attacker_losses, defender_losses) =
        resolve_round(roll(rng, committed - 1), roll(rng, defender_troops));

    let mut conquered = conquered;
    if defender_losses == defender_troops {
        // Conquest: the committed troops that survived their pairings
        // move in; the source gives up the full commitment.
        let moved = committed - attacker_losses;
        game.board.add_troops(to, -i64::from(defender_troops));
        game.board.set_owner(to, &player);
        game.board.add_troops(to, i64::from(moved));
        game.board.add_troops(from, -i64::from(committed));
        conquered = true;

        if let Some(defender) = defender {
            if game.board.territories_owned(&defender).count() == 0 {
                eliminate(&mut game, &defender);
            }
        }
    } else {
        game.board.add_troops(from, -i64::from(attacker_losses));
        game.board.add_troops(to, -i64::from(defender_losses));
    }

    if game.current_owns_everything() {
        return Ok(win(game));
    }
    Ok(GameState::Attack { game, conquered })
}

/// Removes a player with no territories left, folding their hand into
/// the current player's.
fn eliminate(game: &mut Game, defender: &str) {
    if let Some(index) = game.players.iter().position(|p| p.name == defender) {
        let loser = game.players.remove(index);
        if index < game.current {
            game.current -= 1;
        }
        game.current_player_mut().cards.extend(loser.cards);
    }
}
