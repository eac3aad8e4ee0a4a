//! The fortify phase.
//!
//! The turn closes with an optional troop move between two owned,
//! adjacent territories. Either way the turn passes to the next player,
//! who is credited a fresh round of reinforcements on the way into
//! their Place phase.

use crate::space::ActionSpace;

use super::{Action, Game, GameError, GameState, Phase};

/// Every (owned from, owned adjacent to, moved troops) triple with at
/// least two troops staying behind, plus the option to pass.
pub(super) fn actions(game: &Game) -> ActionSpace {
    let player = game.current_player().name.as_str();
    let mut moves = Vec::new();
    for terr in game.board.territories_owned(player) {
        for neighbor in &terr.neighbors {
            let friendly = matches!(game.board.owner(neighbor), Ok(Some(owner)) if owner == player);
            if friendly {
                for troops in 1..terr.troops.saturating_sub(1) {
                    moves.push(Action::Fortify {
                        from: terr.name.clone(),
                        to: neighbor.clone(),
                        troops,
                    });
                }
            }
        }
    }
    moves.push(Action::DontFortify);
    ActionSpace::from_actions(moves)
}

/// Hands the turn to the next player and credits their reinforcements.
fn end_turn(mut game: Game) -> GameState {
    game.advance_player();
    let credit = game.calculate_reinforcements(&game.current_player().name);
    game.current_player_mut().reinforcements += credit;
    GameState::Place(game)
}

pub(super) fn apply(
    mut game: Game,
    action: &Action,
) -> Result<GameState, (GameState, GameError)> {
    let (from, to, moved) = match action {
        Action::Fortify { from, to, troops } => (from, to, *troops),
        Action::DontFortify => return Ok(end_turn(game)),
        _ => {
            return Err((
                GameState::Fortify(game),
                GameError::WrongAction { phase: Phase::Fortify },
            ))
        }
    };

    let player = game.current_player().name.clone();
    macro_rules! reject {
        ($kind:expr) => {
            return Err((GameState::Fortify(game), $kind))
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
    match game.board.owner(to) {
        Ok(Some(owner)) if owner == player => {}
        Ok(_) => reject!(GameError::NotOwned { territory: to.clone(), player }),
        Err(err) => reject!(err.into()),
    }
    if moved < 1 || moved >= available {
        reject!(GameError::FortifyTroops { moved, available: available.saturating_sub(1) });
    }

    game.board.add_troops(from, -i64::from(moved));
    game.board.add_troops(to, i64::from(moved));
    Ok(end_turn(game))
}
