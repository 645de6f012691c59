//! Handlers for the `full` and `partial` sync commands.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use themesync_core::domain::{RevisionBatch, SyncTarget, ThemeSlug};
use themesync_sync::orchestrator::{SyncMode, SyncRequest, run_sync};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Run a full sync over the themes named in `list`.
pub async fn full(
    ctx: &CliContext,
    list: &Path,
    target: &str,
    parallel: usize,
) -> Result<(), CliError> {
    let target = parse_target(target)?;
    let themes = read_theme_list(list)?;

    let outcome = run_sync(
        SyncRequest {
            target,
            themes,
            mode: SyncMode::Full,
            parallel,
            cancel: ctx.cancel.clone(),
        },
        &ctx.deps,
    )
    .await?;

    println!("{}", outcome.stats);
    Ok(())
}

/// Run a partial sync driven by the revision records in `revisions`.
pub async fn partial(
    ctx: &CliContext,
    revisions: &Path,
    target: &str,
    parallel: usize,
) -> Result<(), CliError> {
    let target = parse_target(target)?;
    let revisions = read_revision_file(revisions)?;
    let themes = pending_themes(&revisions);

    let outcome = run_sync(
        SyncRequest {
            target,
            themes,
            mode: SyncMode::Partial { revisions },
            parallel,
            cancel: ctx.cancel.clone(),
        },
        &ctx.deps,
    )
    .await?;

    println!("{}", outcome.stats);
    if let Some(checkpoint) = outcome.checkpoint {
        println!("local copy now at r{checkpoint}");
    }
    Ok(())
}

fn parse_target(raw: &str) -> Result<SyncTarget, CliError> {
    raw.parse()
        .map_err(|e: themesync_core::domain::UnknownTarget| CliError::Arguments(e.to_string()))
}

/// Read a theme list, one slug per line. `-` reads stdin. Blank lines are
/// skipped; anything else must be a valid slug.
fn read_theme_list(path: &Path) -> Result<Vec<ThemeSlug>, CliError> {
    if path == Path::new("-") {
        parse_theme_list(io::stdin().lock())
    } else {
        parse_theme_list(BufReader::new(File::open(path)?))
    }
}

fn parse_theme_list(reader: impl BufRead) -> Result<Vec<ThemeSlug>, CliError> {
    let mut themes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let slug = ThemeSlug::new(line)
            .map_err(|e| CliError::Arguments(format!("bad theme list entry: {e}")))?;
        themes.push(slug);
    }
    Ok(themes)
}

/// Read the ordered revision file the diff collaborator produces.
fn read_revision_file(path: &Path) -> Result<Vec<RevisionBatch>, CliError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    serde_json::from_str(&raw)
        .map_err(|e| CliError::Arguments(format!("bad revision file: {e}")))
}

/// Every theme the revisions still await, in oldest-first appearance order,
/// each named once.
fn pending_themes(revisions: &[RevisionBatch]) -> Vec<ThemeSlug> {
    let mut seen = HashSet::new();
    let mut themes = Vec::new();
    for batch in revisions {
        for theme in &batch.themes {
            if seen.insert(theme.clone()) {
                themes.push(theme.clone());
            }
        }
    }
    themes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> ThemeSlug {
        ThemeSlug::new(s).unwrap()
    }

    #[test]
    fn test_parse_theme_list_skips_blank_lines() {
        let themes = parse_theme_list("alpha\n\nbeta\n".as_bytes()).unwrap();
        assert_eq!(themes, vec![slug("alpha"), slug("beta")]);
    }

    #[test]
    fn test_parse_theme_list_rejects_bad_slugs() {
        let err = parse_theme_list("alpha\n../escape\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));
    }

    #[test]
    fn test_pending_themes_dedupes_across_revisions() {
        let revisions = vec![
            RevisionBatch::new(10, [slug("a"), slug("b")]),
            RevisionBatch::new(20, [slug("b"), slug("c")]),
        ];
        assert_eq!(
            pending_themes(&revisions),
            vec![slug("a"), slug("b"), slug("c")]
        );
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("themes").unwrap(), SyncTarget::Themes);
        assert_eq!(parse_target("readmes").unwrap(), SyncTarget::Readmes);
        assert!(matches!(
            parse_target("zips"),
            Err(CliError::Arguments(_))
        ));
    }
}
