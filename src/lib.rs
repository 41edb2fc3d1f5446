//! Dome Console Library
//!
//! Client-side workflow engine and typed service client for the Dome
//! logistics order platform: pickup sessions, order batch entry and
//! spreadsheet import, submission formatting, order search, and AWB label
//! rendering.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod batch;
pub mod client;
pub mod config;
pub mod directory;
pub mod errors;
pub mod formatter;
pub mod import;
pub mod label;
pub mod models;
pub mod pickup;
pub mod search;
pub mod session;
pub mod shipper;
pub mod workflow;

pub use client::ServiceClient;
pub use errors::ConsoleError;
pub use session::TokenStore;
