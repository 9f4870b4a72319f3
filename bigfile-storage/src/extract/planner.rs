//! The extraction planner
//!
//! Drives the whole run: entries are visited in ascending offset order
//! so each part file is opened exactly once, names are resolved (or
//! synthesized for unknown hashes), selection and filter policy is
//! applied, the manifest is fed, and payload bytes are copied out.

use crate::archive::{translate, PartLocation, PartStream};
use crate::error::Result;
use crate::extract::{CopyFailure, ExtractOptions, ExtractSummary, UnknownSelection};
use crate::manifest::ManifestWriter;
use crate::resolver::{normalize_resolved, HashList};
use crate::sniffer;
use crate::types::{locale_segment, BigArchive, BigEntry};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Plans and runs the extraction of one archive
pub struct Extractor<'a> {
    archive: &'a BigArchive,
    names: &'a HashList,
    options: ExtractOptions,
}

impl<'a> Extractor<'a> {
    pub fn new(archive: &'a BigArchive, names: &'a HashList, options: ExtractOptions) -> Self {
        Self {
            archive,
            names,
            options,
        }
    }

    /// Extract every selected entry into `output_dir` and write the
    /// manifest. Per-entry copy failures are collected in the summary;
    /// a missing part file or corrupt alignment aborts the run.
    pub fn run(&self, index_path: &Path, output_dir: &Path) -> Result<ExtractSummary> {
        let max_blocks_per_part = self.archive.max_blocks_per_part()?;

        fs::create_dir_all(output_dir)?;
        let mut manifest = ManifestWriter::create(&output_dir.join("bigfile.xml"), self.archive)?;
        let mut parts = PartStream::new(index_path);
        let mut summary = ExtractSummary {
            total: self.archive.entries.len(),
            ..ExtractSummary::default()
        };

        // Stable sort: entries sharing an offset keep their table order
        let mut order: Vec<&BigEntry> = self.archive.entries.iter().collect();
        order.sort_by_key(|entry| entry.offset);
        let total = order.len();

        for (position, entry) in order.into_iter().enumerate() {
            let current = position + 1;
            let location = translate(entry.offset, max_blocks_per_part)?;

            // Advance the part state machine before anything else; a
            // missing part is fatal even for entries later skipped.
            parts.reader_at(location.part_index, location.byte_offset)?;

            let resolved = self.names.resolve(entry.name_hash);
            match (self.options.selection, resolved.is_some()) {
                (UnknownSelection::KnownOnly, false) | (UnknownSelection::UnknownOnly, true) => {
                    summary.skipped_selection += 1;
                    continue;
                }
                _ => {}
            }

            let name = match resolved {
                Some(name) => normalize_resolved(name),
                None => self.unknown_name(&mut parts, entry, location)?,
            };

            let relative = Path::new(&locale_segment(entry.locale)).join(name);
            let relative_str = relative.to_string_lossy().into_owned();

            if let Some(filter) = &self.options.filter {
                if !filter.is_match(&relative_str) {
                    debug!("Filtered out {relative_str}");
                    summary.filtered += 1;
                    continue;
                }
            }

            // Manifest membership is decided by selection + filter
            // only; the overwrite policy below never affects it.
            manifest.write_entry(entry, &relative_str)?;
            summary.selected += 1;

            if self.options.verbose {
                println!("[{current}/{total}] {relative_str}");
            }

            let destination = output_dir.join(&relative);
            if destination.exists() && !self.options.overwrite {
                summary.skipped_existing += 1;
                continue;
            }

            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }

            let reader = parts.reader_at(location.part_index, location.byte_offset)?;
            match write_destination(&destination, reader, entry.uncompressed_size) {
                Ok(()) => summary.written += 1,
                Err(cause) => {
                    warn!("Failed to write {}: {}", destination.display(), cause);
                    summary.failures.push(CopyFailure { destination, cause });
                }
            }
        }

        manifest.finish()?;
        Ok(summary)
    }

    /// Synthesize a name for an entry with no file-list match:
    /// `__UNKNOWN/<ext>/<hash as 8 hex digits>.<ext>`, with the
    /// extension sniffed from up to 64 payload bytes.
    fn unknown_name(
        &self,
        parts: &mut PartStream,
        entry: &BigEntry,
        location: PartLocation,
    ) -> Result<String> {
        let mut prefix = [0u8; 64];
        let mut filled = 0usize;

        if entry.uncompressed_size > 0 {
            let reader = parts.reader_at(location.part_index, location.byte_offset)?;
            let wanted = (entry.uncompressed_size as usize).min(prefix.len());
            while filled < wanted {
                let n = reader.read(&mut prefix[filled..wanted])?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
        }

        let extension = sniffer::detect(&prefix[..filled]);
        let name = Path::new("__UNKNOWN")
            .join(extension)
            .join(format!("{:08X}.{}", entry.name_hash, extension));
        Ok(name.to_string_lossy().into_owned())
    }
}

/// Copy exactly `size` payload bytes to a freshly created destination
/// file; zero-size entries produce an empty file.
fn write_destination(destination: &Path, reader: &mut impl Read, size: u32) -> io::Result<()> {
    let mut output = File::create(destination)?;
    if size > 0 {
        let copied = io::copy(&mut reader.take(u64::from(size)), &mut output)?;
        if copied != u64::from(size) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read: {copied} of {size} bytes"),
            ));
        }
    }
    Ok(())
}
