//! omada-monitor - Omada controller client monitor library
//!
//! This library exposes the encrypted credential store, the client record
//! formatter and the refresh cycle that back the terminal monitor.

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod credentials;
pub mod format;
pub mod logging;
pub mod login;
pub mod models;
pub mod monitor;
pub mod output;
