//! CLI command implementations.

pub mod common;
pub mod edit;
pub mod inspect;
