//! File I/O utilities for reading hand and library files and ensuring directories.
//!
//! ## Compressed File Support
//!
//! The `read_text_auto` function automatically detects and decompresses .zst
//! (Zstandard) compressed files based on the file extension.

/// Read text file with automatic .zst decompression detection.
///
/// If the path ends with ".zst" the file is decompressed with Zstandard.
/// A leading UTF-8 BOM is stripped.
///
/// # Example
///
/// ```rust,no_run
/// # use librarian_cli::io_utils::read_text_auto;
///
/// // Read plain text file
/// let content = read_text_auto("hands.jsonl").unwrap();
///
/// // Read compressed file (automatic decompression)
/// let compressed = read_text_auto("hands.jsonl.zst").unwrap();
/// ```
pub fn read_text_auto(path: &str) -> Result<String, String> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path).map_err(|e| e.to_string())?;
        let dec = zstd::stream::decode_all(comp.as_slice()).map_err(|e| e.to_string())?;
        String::from_utf8(dec).map_err(|e| e.to_string())?
    } else {
        std::fs::read_to_string(path).map_err(|e| e.to_string())?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Ensure parent directory exists for given path, creating if needed.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// # use librarian_cli::io_utils::ensure_parent_dir;
///
/// let path = Path::new("data/library.sqlite");
/// ensure_parent_dir(path).unwrap();
/// ```
pub fn ensure_parent_dir(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Non-blank lines of a JSONL document with their 1-based line numbers.
pub fn jsonl_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_utf8_bom() {
        let mut s = "\u{feff}hello".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_strip_utf8_bom_no_bom() {
        let mut s = "hello".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_read_text_auto_decompresses_zst() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hands.jsonl.zst");
        let compressed = zstd::stream::encode_all("{\"preflop\":\"1r2c\"}\n".as_bytes(), 0).unwrap();
        std::fs::write(&path, compressed).unwrap();

        let content = read_text_auto(path.to_str().unwrap()).unwrap();
        assert_eq!(content, "{\"preflop\":\"1r2c\"}\n");
    }

    #[test]
    fn test_read_text_auto_missing_file() {
        assert!(read_text_auto("/nonexistent/hands.jsonl").is_err());
    }

    #[test]
    fn test_jsonl_lines_skips_blanks_and_numbers_from_one() {
        let lines: Vec<_> = jsonl_lines("a\n\n  \nb\n").collect();
        assert_eq!(lines, vec![(1, "a"), (4, "b")]);
    }

    #[test]
    fn test_ensure_parent_dir_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("subdir").join("library.sqlite");

        let result = ensure_parent_dir(&nested_path);
        assert!(result.is_ok());
        assert!(temp_dir.path().join("subdir").exists());
    }

    #[test]
    fn test_ensure_parent_dir_no_parent() {
        let path = std::path::Path::new("library.sqlite");
        assert!(ensure_parent_dir(path).is_ok());
    }
}
