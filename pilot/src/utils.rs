//! Utility functions

use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// Version information for the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("PILOT_GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("PILOT_BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

fn with_scheme(input: &str) -> String {
    let input = input.trim();
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("http://{}", input)
    }
}

/// Check a user-entered server address.
///
/// The host must be `localhost`, an IPv4 literal, or a name containing a
/// dot. Localhost and IP hosts also need an explicit, non-default port.
pub fn is_valid_server_url(input: &str) -> bool {
    let Ok(url) = Url::parse(&with_scheme(input)) else {
        return false;
    };

    match url.host() {
        Some(Host::Domain("localhost")) | Some(Host::Ipv4(_)) => url.port().is_some(),
        Some(Host::Domain(name)) => name.contains('.'),
        _ => false,
    }
}

/// Add `http://` when no scheme is given and drop one trailing slash
pub fn normalize_server_url(input: &str) -> String {
    let url = with_scheme(input);
    match url.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => url,
    }
}
