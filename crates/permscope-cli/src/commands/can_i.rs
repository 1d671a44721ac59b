//! can-i command - report the permissions a manifest is missing

use console::style;
use permscope_core::{ReleaseAction, Settings, decode_manifest};
use std::io::Read;
use std::path::Path;

use crate::display;
use crate::error::{CliError, Result};
use crate::exit_codes;

/// Run the can-i command
pub async fn run(
    settings: &Settings,
    manifest_path: &Path,
    namespace: Option<&str>,
    action: &ReleaseAction,
    as_user: Option<&str>,
    output_json: bool,
) -> Result<i32> {
    let manifest = read_manifest(manifest_path)?;

    // Decode before connecting so a broken manifest never needs a cluster
    let resources = decode_manifest(&manifest)?;
    tracing::info!("decoded {} resource(s)", resources.len());

    let mut settings = settings.clone();
    if let Some(user) = as_user {
        settings.impersonate = Some(user.to_string());
    }

    let client = permscope_kube::connect(&settings).await?;
    let namespace = namespace.unwrap_or(client.default_namespace()).to_string();
    let forbidden = client
        .forbidden_for_resources(&namespace, action, &resources)
        .await?;

    if output_json {
        let report = serde_json::json!({
            "namespace": namespace,
            "verbs": action.verbs(),
            "allowed": forbidden.is_empty(),
            "forbidden": forbidden,
        });
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
    } else if forbidden.is_empty() {
        println!(
            "{} All permissions granted in namespace {}",
            style("✓").green().bold(),
            style(&namespace).cyan()
        );
    } else {
        println!(
            "{} {} forbidden:",
            style("✗").red().bold(),
            display::pluralize(forbidden.len(), "action is", "actions are")
        );
        println!();
        print!("{}", display::forbidden_table(&forbidden));
    }

    Ok(if forbidden.is_empty() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FORBIDDEN
    })
}

fn read_manifest(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut manifest = String::new();
        std::io::stdin().read_to_string(&mut manifest)?;
        return Ok(manifest);
    }

    std::fs::read_to_string(path).map_err(|e| CliError::Io {
        message: format!("{}: {}", path.display(), e),
    })
}
