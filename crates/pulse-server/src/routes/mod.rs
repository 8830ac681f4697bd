pub mod roster;
pub mod snapshot;
