//! Guillotine cutting-stock optimizer for sheet goods: panels are grouped
//! by material, packed onto stock sheets with saw and finishing allowances,
//! and reported with per-sheet waste.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod export;
pub mod guillotine;
pub mod packer;
pub mod render;
pub mod report;
pub mod types;
