//! Authentication helpers

pub mod deep_link;

pub use deep_link::DeepLinkAuth;
