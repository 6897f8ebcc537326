//! coolify-pilot library
//!
//! Client, pipeline and configuration modules behind the `coolify-pilot`
//! binary.

pub mod authn;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod git;
pub mod http;
pub mod logs;
pub mod models;
pub mod prompt;
pub mod sink;
pub mod storage;
pub mod utils;
pub mod workers;
