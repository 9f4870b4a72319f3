//! The unpack command: validate arguments, load the file lists, parse
//! the index, and run the extraction.

use crate::Cli;
use bigfile_storage::extract::{ExtractOptions, Extractor};
use bigfile_storage::index::IndexParser;
use bigfile_storage::resolver::HashList;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn handle(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.input.extension().and_then(|s| s.to_str()) != Some("000") {
        eprintln!("bigfile-unpack: input must be a .000 index file");
        eprintln!("Usage: bigfile-unpack [OPTIONS] <INPUT> [OUTPUT]");
        eprintln!("Try 'bigfile-unpack --help' for more information.");
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));

    // Configuration errors surface here, before any extraction begins
    let mut options = ExtractOptions {
        overwrite: cli.overwrite,
        selection: cli.selection(),
        filter: None,
        verbose: !cli.quiet,
    };
    if let Some(pattern) = &cli.filter {
        options = options.with_filter(pattern)?;
    }

    let names = load_names(cli.project.as_deref(), &cli.input)?;
    let archive = IndexParser::parse_file(&cli.input)?;
    info!(
        "Index: {} entries, alignment {:#x}, {} endian",
        archive.entries.len(),
        archive.data_alignment,
        archive.endian.name()
    );

    let summary = Extractor::new(&archive, &names, options).run(&cli.input, &output)?;

    println!(
        "Extracted {} of {} entries into {} ({} skipped existing)",
        summary.written,
        summary.total,
        output.display(),
        summary.skipped_existing
    );

    if !summary.failures.is_empty() {
        eprintln!("{} entries failed to extract:", summary.failures.len());
        for failure in &summary.failures {
            eprintln!("  {}: {}", failure.destination.display(), failure.cause);
        }
    }

    Ok(())
}

/// `foo.000` unpacks into `foo_unpack` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let mut stem = input.with_extension("").into_os_string();
    stem.push("_unpack");
    PathBuf::from(stem)
}

/// Find the file list project: an explicit `--project` directory, else
/// a `filelists` directory next to the input. Without one, every entry
/// is treated as unknown.
fn load_names(
    project: Option<&Path>,
    input: &Path,
) -> Result<HashList, Box<dyn std::error::Error>> {
    let dir = project.map(Path::to_path_buf).or_else(|| {
        let candidate = input.parent()?.join("filelists");
        candidate.is_dir().then_some(candidate)
    });

    match dir {
        Some(dir) if dir.is_dir() => Ok(HashList::load_project(&dir)?),
        Some(dir) => {
            warn!(
                "File list project {} not found; treating all entries as unknown",
                dir.display()
            );
            Ok(HashList::empty())
        }
        None => {
            warn!("No file list project loaded; treating all entries as unknown");
            Ok(HashList::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output(Path::new("/data/bigfile.000")),
            PathBuf::from("/data/bigfile_unpack")
        );
    }
}
