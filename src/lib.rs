//! Bondhon - matrimony biodata platform
//!
//! Library crate consumed by the `bondhon` binary, the `generate_types`
//! binary and the integration tests. The wizard module is the core form
//! controller; rest exposes it over HTTP and ui drives it in a terminal.

// Allow dead code in the library - some helpers are only used by one binary
#![allow(dead_code)]

pub mod auth;
pub mod config;
pub mod logging;
pub mod payments;
pub mod profile;
pub mod rest;
pub mod search;
pub mod share;
pub mod types;
pub mod ui;
pub mod wizard;
