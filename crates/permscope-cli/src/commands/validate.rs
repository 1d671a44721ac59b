//! validate command - check release access in a namespace

use console::style;
use permscope_core::Settings;

use crate::error::Result;
use crate::exit_codes;

/// Run the validate command
pub async fn run(settings: &Settings, namespace: &str) -> Result<i32> {
    let client = permscope_kube::connect(settings).await?;

    if client.validate_for_namespace(namespace).await? {
        println!(
            "{} You can read releases in namespace {}",
            style("✓").green().bold(),
            style(namespace).cyan()
        );
        Ok(exit_codes::SUCCESS)
    } else {
        println!(
            "{} You cannot read releases in namespace {} (missing 'get secrets')",
            style("✗").red().bold(),
            style(namespace).cyan()
        );
        Ok(exit_codes::FORBIDDEN)
    }
}
