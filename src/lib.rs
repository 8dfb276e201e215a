//! Absence Coverage Engine for School Districts
//!
//! This crate computes the figures behind a teacher-absence dashboard: absence
//! days and replacement cost per teacher and school year, and what a
//! deductible-style absence coverage policy would pay at each threshold.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod source;
