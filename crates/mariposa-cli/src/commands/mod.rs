//! Command implementations

pub mod create;
pub mod migrate;
pub mod renamed;
