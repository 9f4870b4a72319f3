//! Manifest emission
//!
//! `bigfile.xml` records everything needed to rebuild the hash-to-path
//! mapping later: the archive attributes once at the top, then one
//! `entry` element per retained entry in processing order, with a
//! comment naming each locale at the start of its run.

use crate::error::Result;
use crate::types::{locale_name, BigArchive, BigEntry};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Streaming writer for the extraction manifest
pub struct ManifestWriter<W: Write> {
    writer: W,
    last_locale: Option<u32>,
}

impl ManifestWriter<BufWriter<File>> {
    /// Create `bigfile.xml` at the given path and write the header.
    pub fn create(path: &Path, archive: &BigArchive) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), archive)
    }
}

impl<W: Write> ManifestWriter<W> {
    /// Write the document header and the `files` root element.
    pub fn new(mut writer: W, archive: &BigArchive) -> Result<Self> {
        writeln!(writer, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(
            writer,
            r#"<files endian="{}" basepath="{}" alignment="{:08X}">"#,
            archive.endian.name(),
            escape(&archive.base_path),
            archive.data_alignment
        )?;
        Ok(Self {
            writer,
            last_locale: None,
        })
    }

    /// Record one retained entry. Emits a locale comment when the
    /// locale differs from the previous record's.
    pub fn write_entry(&mut self, entry: &BigEntry, path: &str) -> Result<()> {
        if self.last_locale != Some(entry.locale) {
            writeln!(
                self.writer,
                "  <!-- {:08X} = {} -->",
                entry.locale,
                locale_name(entry.locale)
            )?;
            self.last_locale = Some(entry.locale);
        }

        writeln!(
            self.writer,
            r#"  <entry hash="{:08X}" locale="{:08X}">{}</entry>"#,
            entry.name_hash,
            entry.locale,
            escape(path)
        )?;
        Ok(())
    }

    /// Close the root element and flush.
    pub fn finish(mut self) -> Result<W> {
        writeln!(self.writer, "</files>")?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

// The manifest dialect is tiny and fixed, so escaping is done locally
// rather than through an XML crate.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
