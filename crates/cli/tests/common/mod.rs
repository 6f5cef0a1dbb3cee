//! Common utilities for integration tests

pub mod cli;
pub mod fixtures;

pub use fixtures::ChefRepo;
