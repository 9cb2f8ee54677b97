//! ErenAI command-line front end.
//!
//! Configuration loading and logging setup live here, separate from
//! main.rs, so they can be tested.

pub mod config;
pub mod logging;
