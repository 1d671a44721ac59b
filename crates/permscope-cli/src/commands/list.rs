//! List command - list releases with their current status

use permscope_core::{AppOverview, Settings, StatusFilter, StorageKind};
use permscope_kube::{FileStore, ListOptions, ReleaseAggregator};
use std::path::PathBuf;

use crate::display;
use crate::error::{CliError, Result};
use crate::exit_codes;

/// Arguments of the list command
pub struct ListArgs {
    pub namespace: Option<String>,
    pub all_namespaces: bool,
    pub limit: Option<usize>,
    pub status: Option<String>,
    pub from_file: Option<PathBuf>,
    pub json: bool,
}

/// Run the list command
pub async fn run(settings: &Settings, args: &ListArgs) -> Result<i32> {
    let status = args.status.as_deref().unwrap_or_default();
    for token in StatusFilter::unrecognized(status) {
        tracing::warn!(
            "'{}' is not a release status; it only matches releases in UNKNOWN state",
            token
        );
    }

    let mut options = ListOptions {
        namespace: if args.all_namespaces {
            String::new()
        } else {
            args.namespace.clone().unwrap_or_default()
        },
        page_size: args.limit.unwrap_or(settings.page_size),
        status: StatusFilter::parse(status),
    };

    let releases = match revisions_file(settings, args)? {
        Some(path) => {
            tracing::info!("reading revisions from {}", path.display());
            ReleaseAggregator::new(FileStore::new(path))
                .list(&options)
                .await?
        }
        None => {
            let client = permscope_kube::connect(settings).await?;
            if args.namespace.is_none() && !args.all_namespaces {
                options.namespace = client.default_namespace().to_string();
            }
            client.list_releases(&options).await?
        }
    };

    print_releases(&releases, &options, args.json)?;
    Ok(exit_codes::SUCCESS)
}

/// Revisions file to read, if the listing is file-backed
fn revisions_file(settings: &Settings, args: &ListArgs) -> Result<Option<PathBuf>> {
    if let Some(path) = &args.from_file {
        return Ok(Some(path.clone()));
    }

    match settings.storage {
        StorageKind::Secrets => Ok(None),
        StorageKind::File => settings
            .revisions_file
            .clone()
            .map(Some)
            .ok_or_else(|| {
                CliError::config_with_help(
                    "storage 'file' requires revisionsFile",
                    "set revisionsFile in the configuration or pass --from-file",
                )
            }),
    }
}

fn print_releases(releases: &[AppOverview], options: &ListOptions, output_json: bool) -> Result<()> {
    if output_json {
        let json = serde_json::to_string_pretty(releases)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    if releases.is_empty() {
        match options.namespace_filter() {
            Some(ns) => println!("No releases found in namespace {}", ns),
            None => println!("No releases found in any namespace"),
        }
        return Ok(());
    }

    display::print_releases(releases);
    Ok(())
}
