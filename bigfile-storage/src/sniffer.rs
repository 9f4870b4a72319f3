//! File type detection for unresolved entries
//!
//! Entries whose name hash has no match in the file lists are still
//! extracted; up to 64 bytes of payload are sniffed for a known magic
//! number to pick a plausible extension.

/// Guess a file extension from a payload prefix. Falls back to `bin`.
pub fn detect(prefix: &[u8]) -> &'static str {
    if prefix.len() >= 4 {
        match &prefix[..4] {
            b"CDRM" => return "drm",
            b"CRID" => return "usm",
            b"FSB4" => return "fsb",
            b"Mus!" => return "mus",
            b"RIFF" => return "wav",
            b"OggS" => return "ogg",
            b"DDS " => return "dds",
            b"\x89PNG" => return "png",
            b"PCD9" => return "pcd",
            _ => {}
        }
    }

    if !prefix.is_empty() && looks_like_text(prefix) {
        return "txt";
    }

    "bin"
}

fn looks_like_text(prefix: &[u8]) -> bool {
    prefix
        .iter()
        .all(|&b| b.is_ascii_graphic() || b == b' ' || b == b'\t' || b == b'\r' || b == b'\n')
}
