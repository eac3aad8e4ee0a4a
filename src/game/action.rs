//! Action types for all game phases.
//!
//! One variant per phase. Actions are pure data compared structurally;
//! the state machine validates them against the current phase inside
//! `transition`.

/// A player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Claim an unowned territory during setup.
    PrePlace { territory: String },

    /// Put one initial reinforcement on an owned territory.
    PreAssign { territory: String },

    /// Allocate a turn's reinforcements across chosen territories.
    /// `troops[i]` troops land on `territories[i]`; the vectors run in
    /// parallel and the troop counts sum to the full reinforcement count.
    Place {
        territories: Vec<String>,
        troops: Vec<u32>,
    },

    /// Commit `troops` from an owned territory against an enemy neighbor.
    Attack {
        from: String,
        to: String,
        troops: u32,
    },

    /// Stop attacking and move on to fortification.
    DontAttack,

    /// Move `troops` between two owned adjacent territories.
    Fortify {
        from: String,
        to: String,
        troops: u32,
    },

    /// End the turn without fortifying.
    DontFortify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let a = Action::Attack {
            from: "Alaska".to_string(),
            to: "Kamchatka".to_string(),
            troops: 3,
        };
        let b = Action::Attack {
            from: "Alaska".to_string(),
            to: "Kamchatka".to_string(),
            troops: 3,
        };
        assert_eq!(a, b);
        assert_ne!(a, Action::DontAttack);
    }

    #[test]
    fn variants_are_distinct() {
        let claim = Action::PrePlace { territory: "Peru".to_string() };
        let assign = Action::PreAssign { territory: "Peru".to_string() };
        assert_ne!(claim, assign);
    }
}
