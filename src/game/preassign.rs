//! The initial troop-assignment phase.
//!
//! After the board is claimed, players spend their remaining initial
//! reinforcements one troop at a time on territories they own. When
//! everyone reaches zero, turn order restarts at the first player, who
//! is immediately credited a turn's reinforcements, and play proper
//! begins with the Place phase.

use crate::space::ActionSpace;

use super::{Action, Game, GameError, GameState, Phase};

/// One assignment per territory the current player owns.
pub(super) fn actions(game: &Game) -> ActionSpace {
    let player = game.current_player().name.as_str();
    let assigns = game
        .board
        .territories_owned(player)
        .map(|t| Action::PreAssign {
            territory: t.name.clone(),
        })
        .collect();
    ActionSpace::from_actions(assigns)
}

/// Entry into the assignment phase, from a claim or an assignment.
///
/// Territory splits can leave the claim counts uneven (and large player
/// counts can exhaust the initial pool during claiming outright), so the
/// player up next may have nothing left to assign; skip past anyone at
/// zero. When every player is spent, turn order restarts at the first
/// player, who is credited a turn's reinforcements on the way into their
/// Place phase.
pub(super) fn enter(mut game: Game) -> GameState {
    if game.players.iter().all(|p| p.reinforcements == 0) {
        game.current = 0;
        let credit = game.calculate_reinforcements(&game.players[0].name);
        game.players[0].reinforcements += credit;
        return GameState::Place(game);
    }
    while game.current_player().reinforcements == 0 {
        game.advance_player();
    }
    GameState::PreAssign(game)
}

pub(super) fn apply(
    mut game: Game,
    action: &Action,
) -> Result<GameState, (GameState, GameError)> {
    let territory = match action {
        Action::PreAssign { territory } => territory,
        _ => {
            return Err((
                GameState::PreAssign(game),
                GameError::WrongAction { phase: Phase::PreAssign },
            ))
        }
    };

    let player = game.current_player().name.clone();
    match game.board.owner(territory) {
        Ok(Some(owner)) if owner == player => {}
        Ok(_) => {
            return Err((
                GameState::PreAssign(game),
                GameError::NotOwned {
                    territory: territory.clone(),
                    player,
                },
            ))
        }
        Err(err) => return Err((GameState::PreAssign(game), err.into())),
    }

    game.board.add_troops(territory, 1);
    let current = game.current_player_mut();
    current.reinforcements = current.reinforcements.saturating_sub(1);

    game.advance_player();
    Ok(enter(game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameState, Player};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Plays the claim phase out with first-available actions.
    fn claimed_state(names: &[&str]) -> GameState {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = GameState::new_game(names).unwrap();
        while state.phase() == Phase::PrePlace {
            let action = state.available_actions().get(0).unwrap();
            state = state.transition(&action, &mut rng).unwrap();
        }
        state
    }

    #[test]
    fn actions_cover_exactly_the_owned_territories() {
        let state = claimed_state(&["Nate", "Chris"]);
        assert_eq!(state.phase(), Phase::PreAssign);
        let player = state.current_player().name.clone();
        let owned = state.board().territories_owned(&player).count() as u128;
        let space = state.available_actions();
        assert_eq!(space.len(), owned);
        for action in space.iter() {
            match action {
                Action::PreAssign { territory } => {
                    assert_eq!(state.board().owner(&territory).unwrap(), Some(player.as_str()));
                }
                other => panic!("unexpected action {:?}", other),
            }
        }
    }

    #[test]
    fn assigning_adds_a_troop_and_spends_a_reinforcement() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = claimed_state(&["Nate", "Chris"]);
        let player = state.current_player().name.clone();
        let before = state.reinforcements(&player).unwrap();
        let action = state.available_actions().get(0).unwrap();
        let territory = match &action {
            Action::PreAssign { territory } => territory.clone(),
            _ => unreachable!(),
        };
        let troops_before = state.board().troops(&territory).unwrap();

        let state = state.transition(&action, &mut rng).unwrap();
        assert_eq!(state.board().troops(&territory).unwrap(), troops_before + 1);
        assert_eq!(state.reinforcements(&player).unwrap(), before - 1);
    }

    #[test]
    fn assigning_someone_elses_territory_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = claimed_state(&["Nate", "Chris"]);
        let current = state.current_player().name.clone();
        let other_territory = state
            .board()
            .territories()
            .find(|t| t.owner.as_deref() != Some(current.as_str()))
            .unwrap()
            .name
            .clone();
        let err = state
            .transition(
                &Action::PreAssign { territory: other_territory },
                &mut rng,
            )
            .unwrap_err();
        assert!(matches!(err.kind, GameError::NotOwned { .. }));
    }

    #[test]
    fn spending_everything_moves_to_place_with_credit() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = claimed_state(&["Nate", "Chris"]);
        while state.phase() == Phase::PreAssign {
            let action = state.available_actions().get(0).unwrap();
            state = state.transition(&action, &mut rng).unwrap();
        }
        assert_eq!(state.phase(), Phase::Place);
        assert_eq!(state.current_player().name, "Nate");
        assert_eq!(
            state.reinforcements("Nate").unwrap(),
            state.calculate_reinforcements("Nate")
        );
        assert_eq!(state.reinforcements("Chris").unwrap(), 0);
    }

    #[test]
    fn entry_skips_players_with_nothing_left() {
        let board = crate::board::classic_board().unwrap();
        let players = vec![Player::new("a", 0), Player::new("b", 2)];
        let state = enter(Game {
            board,
            players,
            current: 0,
            card_turnins: 0,
        });
        assert_eq!(state.phase(), Phase::PreAssign);
        assert_eq!(state.current_player().name, "b");
    }

    #[test]
    fn entry_with_everyone_spent_credits_the_first_player() {
        let board = crate::board::classic_board().unwrap();
        let players = vec![Player::new("a", 0), Player::new("b", 0)];
        let state = enter(Game {
            board,
            players,
            current: 1,
            card_turnins: 0,
        });
        assert_eq!(state.phase(), Phase::Place);
        assert_eq!(state.current_player().name, "a");
        assert_eq!(state.reinforcements("a").unwrap(), 3);
    }

    #[test]
    fn uneven_claim_counts_still_drain_to_place() {
        // Four players split 42 territories 11/11/10/10, so two players
        // run out of initial reinforcements before the others.
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = claimed_state(&["P0", "P1", "P2", "P3"]);
        let mut steps = 0;
        while state.phase() == Phase::PreAssign {
            let action = state.available_actions().get(0).unwrap();
            state = state.transition(&action, &mut rng).unwrap();
            steps += 1;
            assert!(steps <= 4 * 25, "assignment phase failed to drain");
        }
        assert_eq!(state.phase(), Phase::Place);
    }
}
