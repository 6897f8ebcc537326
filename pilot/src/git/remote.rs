//! Matching the local repository against Coolify applications

use crate::models::application::Application;
use crate::models::status::AppStatus;

/// Reduce a git remote URL to a lowercase `owner/repo` key.
///
/// Handles scp-style (`git@github.com:owner/repo.git`) and URL-style
/// (`https://github.com/owner/repo`) remotes.
pub fn normalize_git_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let clean = trimmed.trim_end_matches('/').trim_end_matches(".git");

    let mut parts = clean.rsplit(['/', ':']);
    let repo = parts.next().filter(|s| !s.is_empty());
    let owner = parts.next().filter(|s| !s.is_empty());
    match (owner, repo) {
        (Some(owner), Some(repo)) => Some(format!("{}/{}", owner, repo).to_lowercase()),
        _ => Some(clean.to_lowercase()),
    }
}

/// Applications that deploy from `branch`, optionally restricted to the
/// repository behind `remote`, skipping ones already deploying.
pub fn matching_applications<'a>(
    apps: &'a [Application],
    branch: &str,
    remote: Option<&str>,
) -> Vec<&'a Application> {
    let remote_key = remote.and_then(normalize_git_url);

    apps.iter()
        .filter(|app| app.deploy_branch() == Some(branch))
        .filter(|app| app.status() != AppStatus::Deploying)
        .filter(|app| match (&remote_key, app.git_repository.as_deref()) {
            (Some(local), Some(repo)) => normalize_git_url(repo).as_ref() == Some(local),
            _ => true,
        })
        .collect()
}
