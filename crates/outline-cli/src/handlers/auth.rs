//! Auth command handlers

use super::utils::{payload, with_spinner, Session};
use crate::cli::{AuthAction, AuthArgs};
use crate::error::{Error, Result};
use crate::output::{auth_summary, OutputWriter};
use serde_json::json;
use tracing::warn;

/// Handle the auth command
pub async fn handle_auth(args: AuthArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let client = session.client()?;

    match args.action {
        AuthAction::Info => {
            let info = payload(client.auth.info().await?, "auth.info")?;
            output.render(&info, auth_summary)
        }
        AuthAction::Test => {
            let api_url = client.config().api_url.clone();
            let connected = with_spinner(output, "Testing connection...", client.ping()).await;

            if !output.is_human() {
                output.data(&json!({ "apiUrl": api_url, "connected": connected }))?;
            }

            if connected {
                output.success(&format!("✓ Connected to {}", api_url))
            } else {
                warn!(api_url = %api_url, "Connection test failed");
                Err(Error::other(format!(
                    "Could not authenticate against {} (run with -vv for details)",
                    api_url
                )))
            }
        }
    }
}
