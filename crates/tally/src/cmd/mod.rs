//! Command implementations for the tally CLI

pub mod export;
pub mod filter;
pub mod report;
pub mod table;
