// Curio - Library Entry Point
// A personal collection inventory: user-defined templates, schema-less
// items, and the analytics that turn them into a dashboard.

pub mod analytics;
pub mod charts;
pub mod commands;
pub mod constants;
pub mod db;
pub mod error;
pub mod fields;
