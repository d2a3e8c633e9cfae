pub mod keymap;
pub mod machine;

pub use keymap::{Action, JumpUnit, KeyChord, Keymap, LeaderMatch, Step};
pub use machine::{Dispatch, InputMachine, InputState, Overlay};
