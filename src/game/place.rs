//! The reinforcement-placement phase.
//!
//! A turn opens with the player spending their whole reinforcement
//! count in a single action: pick some owned territories and a positive
//! allocation summing to the full count. The space of such actions is
//! combinatorially huge, so it is exposed as a virtual
//! [`PlaceSpace`](crate::space::PlaceSpace) rather than a list.

use crate::space::{ActionSpace, PlaceSpace};

use super::{Action, Game, GameError, GameState, Phase};

pub(super) fn actions(game: &Game) -> ActionSpace {
    let player = game.current_player();
    let owned: Vec<String> = game
        .board
        .territories_owned(&player.name)
        .map(|t| t.name.clone())
        .collect();
    ActionSpace::Place(PlaceSpace::new(owned, player.reinforcements))
}

pub(super) fn apply(
    mut game: Game,
    action: &Action,
) -> Result<GameState, (GameState, GameError)> {
    let (territories, troops) = match action {
        Action::Place { territories, troops } => (territories, troops),
        _ => {
            return Err((
                GameState::Place(game),
                GameError::WrongAction { phase: Phase::Place },
            ))
        }
    };

    if territories.len() != troops.len() {
        return Err((GameState::Place(game), GameError::MismatchedPlacement));
    }
    if troops.iter().any(|&t| t == 0) {
        return Err((GameState::Place(game), GameError::EmptyPlacement));
    }
    let player = game.current_player().name.clone();
    let reinforcements = game.current_player().reinforcements;
    // Summed wide: the action is caller-supplied and may not fit u32.
    let placed: u64 = troops.iter().map(|&t| u64::from(t)).sum();
    if placed != u64::from(reinforcements) {
        return Err((
            GameState::Place(game),
            GameError::WrongPlacementTotal { placed, reinforcements },
        ));
    }
    for territory in territories {
        match game.board.owner(territory) {
            Ok(Some(owner)) if owner == player => {}
            Ok(_) => {
                return Err((
                    GameState::Place(game),
                    GameError::NotOwned {
                        territory: territory.clone(),
                        player,
                    },
                ))
            }
            Err(err) => return Err((GameState::Place(game), err.into())),
        }
    }

    for (territory, count) in territories.iter().zip(troops) {
        game.board.add_troops(territory, i64::from(*count));
    }
    game.current_player_mut().reinforcements = 0;

    Ok(GameState::Attack {
        game,
        conquered: false,
    })
}
