//! End-to-end extraction tests over synthesized archives

use bigfile_storage::extract::{ExtractOptions, Extractor, UnknownSelection};
use bigfile_storage::index::IndexParser;
use bigfile_storage::resolver::{hash_file_name, HashList};
use bigfile_storage::{BigEntry, BigError, DEFAULT_LOCALE};
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tempfile::TempDir;

const ALIGNMENT: u32 = 65536; // 32 blocks per part

const KNOWN_NAME: &str = "pc-w\\audio\\music.mul";
const KNOWN_CONTENT: &[u8] = b"RIFFdata";

fn serialize_index(alignment: u32, entries: &[BigEntry]) -> Vec<u8> {
    let mut data = Vec::new();
    data.write_u32::<LittleEndian>(alignment).unwrap();
    data.extend_from_slice(&[0u8; 64]);
    data.write_u32::<LittleEndian>(entries.len() as u32).unwrap();
    for entry in entries {
        data.write_u32::<LittleEndian>(entry.name_hash).unwrap();
    }
    for entry in entries {
        data.write_u32::<LittleEndian>(entry.offset).unwrap();
        data.write_u32::<LittleEndian>(entry.uncompressed_size).unwrap();
        data.write_u32::<LittleEndian>(entry.locale).unwrap();
    }
    data
}

/// Three-entry archive spanning two parts:
/// - unknown, zero bytes, offset 0, default locale
/// - known name, 8 bytes at block 1 of part 0, default locale
/// - unknown FSB payload, 16 bytes at block 32 (start of part 1), locale 0xA0
fn build_archive(dir: &Path) -> (PathBuf, Vec<BigEntry>) {
    let entries = vec![
        BigEntry {
            name_hash: 0xDEADBEEF,
            locale: DEFAULT_LOCALE,
            uncompressed_size: 0,
            offset: 0,
        },
        BigEntry {
            name_hash: hash_file_name(KNOWN_NAME),
            locale: DEFAULT_LOCALE,
            uncompressed_size: KNOWN_CONTENT.len() as u32,
            offset: 1,
        },
        BigEntry {
            name_hash: 0x01020304,
            locale: 0xA0,
            uncompressed_size: 16,
            offset: 32,
        },
    ];

    let index_path = dir.join("test.000");
    let mut part0 = serialize_index(ALIGNMENT, &entries);
    part0.resize(2048, 0);
    part0.extend_from_slice(KNOWN_CONTENT);
    fs::write(&index_path, part0).unwrap();

    let mut part1 = b"FSB4".to_vec();
    part1.resize(16, 0xAB);
    fs::write(dir.join("test.001"), part1).unwrap();

    (index_path, entries)
}

fn build_project(dir: &Path) -> HashList {
    let project = dir.join("filelists");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("base.filelist"), format!("{KNOWN_NAME}\n")).unwrap();
    HashList::load_project(&project).unwrap()
}

fn sep(path: &str) -> String {
    path.replace('/', &MAIN_SEPARATOR.to_string())
}

#[test]
fn extracts_known_and_unknown_entries() {
    let dir = TempDir::new().unwrap();
    let (index_path, _) = build_archive(dir.path());
    let names = build_project(dir.path());
    let output = dir.path().join("out");

    let archive = IndexParser::parse_file(&index_path).unwrap();
    let summary = Extractor::new(&archive, &names, ExtractOptions::default())
        .run(&index_path, &output)
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.selected, 3);
    assert_eq!(summary.written, 3);
    assert!(summary.failures.is_empty());

    // No name match, zero size, sniffed "bin"
    let unknown_empty = output.join(sep("default/__UNKNOWN/bin/DEADBEEF.bin"));
    assert!(unknown_empty.is_file());
    assert_eq!(fs::metadata(&unknown_empty).unwrap().len(), 0);

    let known = output.join(sep("default/pc-w/audio/music.mul"));
    assert_eq!(fs::read(&known).unwrap(), KNOWN_CONTENT);

    let sniffed = output.join(sep("000000A0/__UNKNOWN/fsb/01020304.fsb"));
    assert_eq!(fs::read(&sniffed).unwrap().len(), 16);

    let manifest = fs::read_to_string(output.join("bigfile.xml")).unwrap();
    assert!(manifest.contains(r#"<files endian="little" basepath="" alignment="00010000">"#));
    assert!(manifest.contains("<!-- FFFFFFFF = Default -->"));
    assert!(manifest.contains("<!-- 000000A0 = Japanese|Polish -->"));
    assert!(manifest.contains(&format!(
        r#"<entry hash="DEADBEEF" locale="FFFFFFFF">{}</entry>"#,
        sep("default/__UNKNOWN/bin/DEADBEEF.bin")
    )));

    // Offsets ascend, so the default-locale run comes first
    let default_pos = manifest.find("FFFFFFFF = Default").unwrap();
    let locale_pos = manifest.find("000000A0 = Japanese|Polish").unwrap();
    assert!(default_pos < locale_pos);
}

#[test]
fn overwrite_policy_skips_copy_but_keeps_manifest_record() {
    let dir = TempDir::new().unwrap();
    let (index_path, _) = build_archive(dir.path());
    let names = build_project(dir.path());
    let output = dir.path().join("out");

    let known = output.join(sep("default/pc-w/audio/music.mul"));
    fs::create_dir_all(known.parent().unwrap()).unwrap();
    fs::write(&known, b"pre-existing").unwrap();

    let archive = IndexParser::parse_file(&index_path).unwrap();
    let summary = Extractor::new(&archive, &names, ExtractOptions::default())
        .run(&index_path, &output)
        .unwrap();

    assert_eq!(summary.skipped_existing, 1);
    assert_eq!(summary.written, 2);
    assert_eq!(fs::read(&known).unwrap(), b"pre-existing");

    let manifest = fs::read_to_string(output.join("bigfile.xml")).unwrap();
    assert!(manifest.contains(&sep("default/pc-w/audio/music.mul")));

    // A second run with overwrite enabled replaces the bytes
    let options = ExtractOptions {
        overwrite: true,
        ..ExtractOptions::default()
    };
    Extractor::new(&archive, &names, options)
        .run(&index_path, &output)
        .unwrap();
    assert_eq!(fs::read(&known).unwrap(), KNOWN_CONTENT);
}

#[test]
fn filter_retains_only_matching_locale() {
    let dir = TempDir::new().unwrap();
    let (index_path, _) = build_archive(dir.path());
    let names = build_project(dir.path());
    let output = dir.path().join("out");

    let options = ExtractOptions::default().with_filter("^DEFAULT").unwrap();

    let archive = IndexParser::parse_file(&index_path).unwrap();
    let summary = Extractor::new(&archive, &names, options)
        .run(&index_path, &output)
        .unwrap();

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.filtered, 1);
    assert!(!output.join("000000A0").exists());

    let manifest = fs::read_to_string(output.join("bigfile.xml")).unwrap();
    assert!(!manifest.contains("000000A0"));
}

#[test]
fn known_only_selection_drops_unknown_shaped_paths() {
    let dir = TempDir::new().unwrap();
    let (index_path, _) = build_archive(dir.path());
    let names = build_project(dir.path());
    let output = dir.path().join("out");

    let options = ExtractOptions {
        selection: UnknownSelection::KnownOnly,
        ..ExtractOptions::default()
    };
    let archive = IndexParser::parse_file(&index_path).unwrap();
    let summary = Extractor::new(&archive, &names, options)
        .run(&index_path, &output)
        .unwrap();

    assert_eq!(summary.selected, 1);
    assert_eq!(summary.skipped_selection, 2);

    let manifest = fs::read_to_string(output.join("bigfile.xml")).unwrap();
    assert!(!manifest.contains("__UNKNOWN"));
    assert!(manifest.contains(&sep("default/pc-w/audio/music.mul")));
}

#[test]
fn unknown_only_selection_keeps_only_unknown_shaped_paths() {
    let dir = TempDir::new().unwrap();
    let (index_path, _) = build_archive(dir.path());
    let names = build_project(dir.path());
    let output = dir.path().join("out");

    let options = ExtractOptions {
        selection: UnknownSelection::UnknownOnly,
        ..ExtractOptions::default()
    };
    let archive = IndexParser::parse_file(&index_path).unwrap();
    let summary = Extractor::new(&archive, &names, options)
        .run(&index_path, &output)
        .unwrap();

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.skipped_selection, 1);
    assert!(!output.join(sep("default/pc-w")).exists());

    let manifest = fs::read_to_string(output.join("bigfile.xml")).unwrap();
    for line in manifest.lines().filter(|l| l.contains("<entry")) {
        assert!(line.contains("__UNKNOWN"), "not unknown-shaped: {line}");
    }
}

#[test]
fn missing_part_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (index_path, _) = build_archive(dir.path());
    let names = build_project(dir.path());
    fs::remove_file(dir.path().join("test.001")).unwrap();

    let archive = IndexParser::parse_file(&index_path).unwrap();
    let result = Extractor::new(&archive, &names, ExtractOptions::default())
        .run(&index_path, &dir.path().join("out"));

    assert!(matches!(result, Err(BigError::PartNotFound { part: 1, .. })));
}

#[test]
fn offset_ties_keep_table_order() {
    let dir = TempDir::new().unwrap();
    let entries = vec![
        BigEntry {
            name_hash: 0xAAAA0000,
            locale: DEFAULT_LOCALE,
            uncompressed_size: 0,
            offset: 0,
        },
        BigEntry {
            name_hash: 0xBBBB0000,
            locale: DEFAULT_LOCALE,
            uncompressed_size: 0,
            offset: 0,
        },
    ];

    let index_path = dir.path().join("tie.000");
    fs::write(&index_path, serialize_index(ALIGNMENT, &entries)).unwrap();

    let archive = IndexParser::parse_file(&index_path).unwrap();
    let output = dir.path().join("out");
    Extractor::new(&archive, &HashList::empty(), ExtractOptions::default())
        .run(&index_path, &output)
        .unwrap();

    let manifest = fs::read_to_string(output.join("bigfile.xml")).unwrap();
    let first = manifest.find("AAAA0000").unwrap();
    let second = manifest.find("BBBB0000").unwrap();
    assert!(first < second);
}
