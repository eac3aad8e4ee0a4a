//! Board representation.
//!
//! Contains the core data structures for territories, continents, the
//! board itself, and map loading.

pub mod continent;
pub mod map;
pub mod state;
pub mod territory;

pub use continent::Continent;
pub use map::{classic_board, load_board, parse_board, MapError};
pub use state::{Board, BoardError};
pub use territory::Territory;
