//! Metro schedule server.
//!
//! Fetches the timetable feed of a single-line subway, infers how long each
//! hop between adjacent stations takes, and serves the result as JSON.

pub mod config;
pub mod domain;
pub mod feed;
pub mod refresh;
pub mod schedule;
pub mod store;
pub mod web;
