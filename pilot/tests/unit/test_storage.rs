//! Configuration storage and connection resolution

use secrecy::{ExposeSecret, SecretString};
use tokio_test::{assert_err, assert_ok};

use coolify_pilot::authn::DeepLinkAuth;
use coolify_pilot::storage::{
    resolve_connection, ConnectionOverrides, Credentials, Settings, StorageLayout,
};
use coolify_pilot::utils::{is_valid_server_url, normalize_server_url};

#[tokio::test]
async fn test_configured_layout_resolves_client() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path().join("coolify-pilot"));

    let raw = "coolify.example.com/";
    assert!(is_valid_server_url(raw));
    let settings = Settings {
        server_url: Some(normalize_server_url(raw)),
        ..Settings::default()
    };
    settings.save(&layout.settings_file()).await.unwrap();
    Credentials::new(SecretString::from("sk-live"))
        .save(&layout.credentials_file())
        .await
        .unwrap();

    let connection = assert_ok!(resolve_connection(&layout, &ConnectionOverrides::default()).await);
    let client = assert_ok!(connection.client());
    assert_eq!(client.base_url(), "http://coolify.example.com");
    assert!(!format!("{:?}", connection).contains("sk-live"));
}

#[tokio::test]
async fn test_deep_link_credentials_round_trip_through_storage() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path());
    let auth = DeepLinkAuth::parse(
        "coolify-pilot://auth?token=sk%2Fdeep&url=https%3A%2F%2Fpaas.example.org%2F",
    )
    .unwrap();

    let settings = Settings {
        server_url: Some(auth.server_url.clone()),
        ..Settings::default()
    };
    settings.save(&layout.settings_file()).await.unwrap();
    Credentials::new(auth.token.clone())
        .save(&layout.credentials_file())
        .await
        .unwrap();

    let connection = resolve_connection(&layout, &ConnectionOverrides::default())
        .await
        .unwrap();
    assert_eq!(connection.server_url, "https://paas.example.org");
    assert_eq!(connection.token.expose_secret(), "sk/deep");
}

#[tokio::test]
async fn test_cleared_credentials_are_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path());
    let settings = Settings {
        server_url: Some("http://10.0.0.3:8000".to_string()),
        ..Settings::default()
    };
    settings.save(&layout.settings_file()).await.unwrap();
    Credentials::new(SecretString::from("sk"))
        .save(&layout.credentials_file())
        .await
        .unwrap();
    Credentials::clear(&layout.credentials_file()).await.unwrap();

    let err = assert_err!(resolve_connection(&layout, &ConnectionOverrides::default()).await);
    assert_eq!(
        err.to_string(),
        "Configuration error: Coolify is not configured. Run `coolify-pilot configure` first."
    );
}
