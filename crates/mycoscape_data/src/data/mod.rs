//! Core data structures for the Mycoscape simulation.

pub mod cell;
pub mod landscape;
pub mod terrain;
pub mod weather;
