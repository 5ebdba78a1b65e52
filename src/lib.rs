//! SQL Playground - a query gateway for a seeded SQLite practice database.
//!
//! The [`gateway::Gateway`] accepts raw SQL text, opens a per-request
//! connection, classifies and runs the statement, and returns a normalized
//! result. [`server`] exposes it over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod query;
pub mod server;
