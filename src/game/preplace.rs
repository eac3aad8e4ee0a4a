//! The territory-claiming phase.
//!
//! Players take round-robin turns claiming unowned territories. Each
//! claim seats one troop and spends one reinforcement. Once every
//! territory has an owner the game moves to initial assignment.

use crate::space::ActionSpace;

use super::preassign;
use super::{Action, Game, GameError, GameState, Phase};

/// One claim per unowned territory.
pub(super) fn actions(game: &Game) -> ActionSpace {
    let claims = game
        .board
        .territories()
        .filter(|t| t.owner.is_none())
        .map(|t| Action::PrePlace {
            territory: t.name.clone(),
        })
        .collect();
    ActionSpace::from_actions(claims)
}

pub(super) fn apply(
    mut game: Game,
    action: &Action,
) -> Result<GameState, (GameState, GameError)> {
    let territory = match action {
        Action::PrePlace { territory } => territory,
        _ => {
            return Err((
                GameState::PrePlace(game),
                GameError::WrongAction { phase: Phase::PrePlace },
            ))
        }
    };

    match game.board.owner(territory) {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Err((
                GameState::PrePlace(game),
                GameError::AlreadyClaimed(territory.clone()),
            ))
        }
        Err(err) => return Err((GameState::PrePlace(game), err.into())),
    }

    let player = game.current_player().name.clone();
    game.board.set_owner(territory, &player);
    game.board.add_troops(territory, 1);
    let current = game.current_player_mut();
    current.reinforcements = current.reinforcements.saturating_sub(1);

    let all_claimed = game.board.territories().all(|t| t.owner.is_some());
    game.advance_player();
    if all_claimed {
        Ok(preassign::enter(game))
    } else {
        Ok(GameState::PrePlace(game))
    }
}
