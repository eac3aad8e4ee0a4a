//! Hegemony engine library.
//!
//! Exposes the board representation, the phase-tagged game state machine,
//! action-space enumeration, and the game driver for use by integration
//! tests and the binary entry point.

pub mod board;
pub mod combinatorics;
pub mod driver;
pub mod game;
pub mod space;
