//! Core library for the `swarmstrike` CLI.
//!
//! `swarmstrike` coordinates a swarm of remote load-test workers: it splits
//! one attack plan across them, drives every worker through its start and
//! report cycle concurrently, and aggregates whatever the swarm brought back
//! into a single report. The [`swarm`] module holds the engine; the rest is
//! the CLI around it.
pub mod args;
pub mod config;
mod entry;
pub mod error;
pub mod swarm;
mod system;

pub use entry::run;
