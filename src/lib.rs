//! helperboot
//!
//! Command line front end: configuration, logging and wiring of the
//! bootstrap and permission use cases.

pub mod adapters;
pub mod bootstrap;
pub mod cli;
