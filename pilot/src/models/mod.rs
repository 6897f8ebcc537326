//! Domain models

pub mod application;
pub mod deployment;
pub mod resource;
pub mod status;
