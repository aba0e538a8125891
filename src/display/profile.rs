//! Profile display formatting
//!
//! Formats profile summaries and validation findings for terminal output.

use crate::profiles::{ProfileIssue, ProfileSummary};

const DASH: &str = "-";

/// Format a list of profiles as a table
pub fn format_profile_list(summaries: &[ProfileSummary]) -> String {
    if summaries.is_empty() {
        return "No profiles found.".to_string();
    }

    let kind_width = summaries
        .iter()
        .map(|s| s.kind.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let name_width = summaries
        .iter()
        .map(|s| s.name.as_deref().unwrap_or(DASH).len())
        .max()
        .unwrap_or(4)
        .max(4);

    let server_width = summaries
        .iter()
        .map(|s| s.server.as_deref().unwrap_or(DASH).len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<kind_width$}  {:<name_width$}  {:<server_width$}  {:>5}  {}\n",
        "Kind",
        "Name",
        "Server",
        "Port",
        "Transport",
        kind_width = kind_width,
        name_width = name_width,
        server_width = server_width,
    ));

    output.push_str(&format!(
        "{:-<kind_width$}  {:-<name_width$}  {:-<server_width$}  {:->5}  {:-<9}\n",
        "",
        "",
        "",
        "",
        "",
        kind_width = kind_width,
        name_width = name_width,
        server_width = server_width,
    ));

    for summary in summaries {
        let port = summary
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| DASH.to_string());

        output.push_str(&format!(
            "{:<kind_width$}  {:<name_width$}  {:<server_width$}  {:>5}  {}\n",
            summary.kind.to_string(),
            summary.name.as_deref().unwrap_or(DASH),
            summary.server.as_deref().unwrap_or(DASH),
            port,
            summary.transport.as_deref().unwrap_or("tcp"),
            kind_width = kind_width,
            name_width = name_width,
            server_width = server_width,
        ));
    }

    output
}

/// Format validation findings, one per line
pub fn format_issues(issues: &[ProfileIssue]) -> String {
    if issues.is_empty() {
        return "All profiles look valid.".to_string();
    }

    let mut output = format!("Found {} problem(s):\n", issues.len());
    for issue in issues {
        output.push_str(&format!("  {}\n", issue));
    }
    output
}
