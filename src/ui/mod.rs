//! egui rendering. Every function here reads from or writes to
//! [`AppState`](crate::state::AppState); none of them touch the data layer
//! directly except through it.

pub mod lookup;
pub mod panels;
pub mod plot;
pub mod tables;
