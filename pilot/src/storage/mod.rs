//! Persistent configuration

pub mod credentials;
pub mod layout;
pub mod resolve;
pub mod settings;

pub use credentials::Credentials;
pub use layout::StorageLayout;
pub use resolve::{resolve_connection, Connection, ConnectionOverrides};
pub use settings::Settings;
