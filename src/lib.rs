//! Course timetabling: assigns events to (period, room) slots under hard
//! constraints and minimises soft-constraint penalties by hill climbing.
//!
//! The engine is [`construct`], [`optimize`] and [`score`]; loading, writing,
//! batch runs and the HTTP server are thin layers on top.

pub mod batch;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod feasibility;
pub mod greedy;
pub mod local_search;
pub mod objective;
pub mod output;
pub mod parser;
pub mod server;
pub mod solver;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::SolverConfig;
pub use data::{Instance, Slot, Solution};
pub use greedy::{Construction, EventOrder, construct};
pub use local_search::{SearchOutcome, optimize};
pub use objective::score;
