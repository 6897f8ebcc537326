//! Trigger-only deploys: start a deployment and return without tailing

use tracing::{info, warn};

use crate::errors::PilotError;
use crate::http::control_plane::ControlPlane;
use crate::prompt::{Notice, Prompter};

use super::pipeline::DeployTarget;

/// Ask the platform to deploy `target` and notify the user exactly once.
///
/// Returns the deployment id when the platform reports one.
pub async fn trigger_only(
    control: &dyn ControlPlane,
    prompter: &dyn Prompter,
    target: &DeployTarget,
) -> Result<Option<String>, PilotError> {
    match control.trigger_deployment(&target.uuid).await {
        Ok(id) => {
            info!("Deployment started for {} ({:?})", target.name, id);
            prompter.notify(Notice::Info(format!(
                "🚀 {} deployment started!",
                target.name
            )));
            Ok(id)
        }
        Err(e) => {
            warn!("Deploy trigger for {} failed: {}", target.name, e);
            prompter.notify(Notice::Error(format!("Deploy failed: {}", e)));
            Err(e)
        }
    }
}
