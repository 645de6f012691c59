//! Handler for the `scan-summary` command.
//!
//! Groups consecutive scan hits (`themes/<slug>/...` paths) into per-theme
//! match counts, then asks the catalog information API how widely each
//! theme is installed and prints an aligned table. Catalog lookups are
//! best-effort; a theme the API no longer knows is shown as removed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CliError;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("themesync/", env!("CARGO_PKG_VERSION"));

/// One run of consecutive scan hits against the same theme.
#[derive(Debug, PartialEq, Eq)]
pub struct ScanGroup {
    /// Theme the hits belong to.
    pub slug: String,
    /// Number of matching lines.
    pub matches: u64,
}

/// Catalog answer for one theme. The API returns `null` for themes it no
/// longer lists.
#[derive(Debug, Deserialize)]
struct ThemeInfo {
    active_installs: Option<u64>,
}

/// Summarize `scan_file` and print the table.
pub async fn execute(scan_file: &Path, api_base: &str) -> Result<(), CliError> {
    let groups = group_scan_hits(BufReader::new(File::open(scan_file)?))?;

    eprintln!(
        "{} matching theme{}",
        groups.len(),
        if groups.len() == 1 { "" } else { "s" }
    );
    if groups.is_empty() {
        return Ok(());
    }

    let name_width = groups
        .iter()
        .map(|group| group.slug.len())
        .max()
        .unwrap_or(0)
        .max("Theme".len());

    let client = reqwest::Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    println!("Matches  {:<name_width$}  Active installs", "Theme");
    println!("=======  {:<name_width$}  ===============", "=".repeat(5));

    for group in &groups {
        let installs = match lookup_installs(&client, api_base, &group.slug).await {
            Some(count) => format!("{:>9}+", thousands(count)),
            None => "   REMOVED".to_string(),
        };
        println!(
            "{:>7}  {:<name_width$}  {installs}",
            group.matches, group.slug
        );
    }

    Ok(())
}

/// Fetch a theme's active-install count. `None` means the catalog no longer
/// lists the theme (or could not be reached).
async fn lookup_installs(client: &reqwest::Client, api_base: &str, slug: &str) -> Option<u64> {
    let response = client
        .get(api_base)
        .query(&[
            ("action", "theme_information"),
            ("request[slug]", slug),
            ("request[fields][active_installs]", "1"),
        ])
        .send()
        .await
        .ok()?;
    if !response.status().is_success() {
        return None;
    }
    let info: Option<ThemeInfo> = response.json().await.ok()?;
    Some(info?.active_installs.unwrap_or(0))
}

/// Group consecutive scan-hit lines by theme.
///
/// A hit looks like `themes/<slug>/<path>` (the leading `themes/` is
/// optional); anything else is ignored. Consecutive hits against the same
/// slug collapse into one group, matching how scan output is ordered.
pub fn group_scan_hits(reader: impl BufRead) -> Result<Vec<ScanGroup>, CliError> {
    let mut groups: Vec<ScanGroup> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let Some(slug) = hit_slug(&line) else {
            continue;
        };
        match groups.last_mut() {
            Some(group) if group.slug == slug => group.matches += 1,
            _ => groups.push(ScanGroup {
                slug: slug.to_string(),
                matches: 1,
            }),
        }
    }

    Ok(groups)
}

/// Extract the theme slug from one scan line, if it is a hit.
fn hit_slug(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("themes/").unwrap_or(line);
    let (slug, _) = rest.split_once('/')?;
    if slug.is_empty() { None } else { Some(slug) }
}

/// Render a count with thousands separators (`1234567` -> `"1,234,567"`).
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_slug_variants() {
        assert_eq!(hit_slug("themes/twentyten/style.css"), Some("twentyten"));
        assert_eq!(hit_slug("twentyten/style.css"), Some("twentyten"));
        assert_eq!(hit_slug("no-slash-here"), None);
        assert_eq!(hit_slug("themes//style.css"), None);
    }

    #[test]
    fn test_groups_consecutive_hits() {
        let input = "themes/alpha/a.php\nthemes/alpha/b.php\nthemes/beta/c.php\n";
        let groups = group_scan_hits(input.as_bytes()).unwrap();
        assert_eq!(
            groups,
            vec![
                ScanGroup {
                    slug: "alpha".to_string(),
                    matches: 2,
                },
                ScanGroup {
                    slug: "beta".to_string(),
                    matches: 1,
                },
            ]
        );
    }

    #[test]
    fn test_nonconsecutive_hits_form_separate_groups() {
        let input = "alpha/a.php\nbeta/b.php\nalpha/c.php\n";
        let groups = group_scan_hits(input.as_bytes()).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].slug, "alpha");
        assert_eq!(groups[2].slug, "alpha");
    }

    #[test]
    fn test_non_hit_lines_are_ignored() {
        let input = "Binary file matches\nthemes/alpha/a.php\n\n";
        let groups = group_scan_hits(input.as_bytes()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].matches, 1);
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
