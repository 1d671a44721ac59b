//! Display formatting for CLI output
//!
//! Tables are rendered as plain text so they can be snapshot-tested;
//! commands add color around them.

use console::{Style, style};
use permscope_core::{Action, AppOverview, ReleaseStatus};

/// Pluralize a word based on count
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Color used for a release status
pub fn status_style(status: ReleaseStatus) -> Style {
    match status {
        ReleaseStatus::Deployed => Style::new().green(),
        ReleaseStatus::Failed => Style::new().red(),
        s if s.is_pending() => Style::new().yellow(),
        _ => Style::new().dim(),
    }
}

/// Render rows as left-aligned columns under a header
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = render(header.to_vec());
    for row in rows {
        out.push_str(&render(row.iter().map(String::as_str).collect()));
    }
    out
}

/// Table of forbidden actions
pub fn forbidden_table(actions: &[Action]) -> String {
    let rows: Vec<Vec<String>> = actions
        .iter()
        .map(|action| {
            let group = if action.api_group.is_empty() {
                "core".to_string()
            } else {
                action.api_group.clone()
            };
            let namespace = if action.cluster_wide {
                "(cluster-wide)".to_string()
            } else {
                action.namespace.clone()
            };
            vec![
                group,
                action.resource.clone(),
                namespace,
                action.verbs.iter().cloned().collect::<Vec<_>>().join(","),
            ]
        })
        .collect();

    table(&["API GROUP", "RESOURCE", "NAMESPACE", "VERBS"], &rows)
}

/// Table of release overviews
pub fn release_table(releases: &[AppOverview]) -> String {
    let rows: Vec<Vec<String>> = releases
        .iter()
        .map(|r| {
            vec![
                r.release_name.clone(),
                r.namespace.clone(),
                r.chart.clone(),
                r.version.clone(),
                r.status.to_string(),
            ]
        })
        .collect();

    table(&["NAME", "NAMESPACE", "CHART", "VERSION", "STATUS"], &rows)
}

/// Print the release table with colored statuses
pub fn print_releases(releases: &[AppOverview]) {
    let rendered = release_table(releases);
    let mut lines = rendered.lines();

    if let Some(header) = lines.next() {
        println!("{}", style(header).bold());
    }
    for (line, release) in lines.zip(releases) {
        let status = release.status.as_str();
        match line.strip_suffix(status) {
            Some(rest) => println!("{}{}", rest, status_style(release.status).apply_to(status)),
            None => println!("{}", line),
        }
    }
}
