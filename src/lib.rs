//! Linkage classification and aggregation for feature dashboards.
//!
//! The [`engine`] turns fetched linkage snapshots (linked sessions, linked
//! documents, phase trees, artifacts and tool-call logs) into ordered,
//! de-duplicated groups and progress counts. [`view`] composes those results
//! for display, [`api`] and the `flink` binary expose them.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod view;
