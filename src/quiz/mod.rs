//! Quiz round state machines. Each session owns its round id and the item
//! in play; the controller creates one on start and drops it when the round
//! ends or the user leaves the section.

pub mod multiple_choice;
pub mod sorting;

pub use multiple_choice::{McPhase, McSession};
pub use sorting::{CategoryBox, SortingPhase, SortingSession};

/// Items shown per round before the client declares it complete.
pub const ROUND_LENGTH: usize = 3;

/// Progress text shown next to a running round, e.g. `2/3`.
pub fn progress(shown: usize) -> String {
    format!("{shown}/{ROUND_LENGTH}")
}
