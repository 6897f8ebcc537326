//! Matching the local branch and remote to Coolify applications

use coolify_pilot::git::remote::{matching_applications, normalize_git_url};
use coolify_pilot::models::application::Application;

fn app(uuid: &str, repo: &str, branch: &str, status: &str) -> Application {
    Application {
        uuid: uuid.to_string(),
        name: uuid.to_string(),
        status: status.to_string(),
        git_repository: Some(repo.to_string()),
        git_branch: Some(branch.to_string()),
        ..Application::default()
    }
}

#[test]
fn test_matches_branch_and_repository() {
    let apps = vec![
        app("shop-prod", "acme/shop", "main", "running:healthy"),
        app("shop-staging", "acme/shop", "staging", "running"),
        app("blog", "acme/blog", "main", "exited"),
        app("shop-busy", "https://github.com/Acme/Shop.git", "main", "deploying"),
    ];

    let matched = matching_applications(&apps, "main", Some("git@github.com:acme/shop.git"));
    let uuids: Vec<&str> = matched.iter().map(|a| a.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["shop-prod"]);
}

#[test]
fn test_unknown_remote_matches_on_branch_only() {
    let apps = vec![
        app("shop", "acme/shop", "main", "running"),
        app("blog", "acme/blog", "main", "stopped"),
    ];
    assert_eq!(matching_applications(&apps, "main", None).len(), 2);
    assert!(matching_applications(&apps, "develop", None).is_empty());
}

#[test]
fn test_remote_forms_normalize_alike() {
    assert_eq!(
        normalize_git_url("ssh://git@gitlab.com/Acme/Shop.git"),
        normalize_git_url("https://gitlab.com/acme/shop")
    );
}
