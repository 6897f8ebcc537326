//! Coolify REST API client

pub mod applications;
pub mod client;
pub mod control_plane;
pub mod deployments;
pub mod health;
pub mod resources;

pub use client::CoolifyClient;
pub use control_plane::{ControlPlane, ResourceSource};
