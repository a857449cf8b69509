//! CLI command implementations.

pub mod amplitudes;
pub mod common;
pub mod run;
pub mod state;
pub mod translate;
pub mod version;
