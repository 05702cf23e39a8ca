//! Path helpers for playlist locations

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left untouched inside a playlist location
const LOCATION_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Scheme prefix of every playlist location
pub const FILE_URI_PREFIX: &str = "file:///";

/// Whether `path` is written in drive-letter form (`C:\...`, `c:/...`)
pub fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Rewrite a native path into the form used inside playlist locations.
///
/// Only drive-letter paths are touched: backslashes become forward slashes
/// and the drive letter is uppercased (`c:\Videos` -> `C:/Videos`). Elsewhere
/// a backslash is an ordinary filename byte. This never touches the disk.
pub fn normalize_separators(path: &str) -> String {
    if !has_drive_letter(path) {
        return path.to_string();
    }

    let mut normalized = path.replace('\\', "/");
    let drive = normalized[..1].to_ascii_uppercase();
    normalized.replace_range(0..1, &drive);
    normalized
}

/// Percent-encode a path, keeping alphanumerics and `/:-_.~` as-is.
/// Escapes use uppercase hex.
pub fn percent_encode_path(path: &str) -> String {
    utf8_percent_encode(path, LOCATION_SAFE).to_string()
}

/// Build the `file:///` location for an absolute path
pub fn to_file_uri(path: &str) -> String {
    let normalized = normalize_separators(path);
    let relative = normalized.strip_prefix('/').unwrap_or(&normalized);
    format!("{}{}", FILE_URI_PREFIX, percent_encode_path(relative))
}

/// Final component of a path. Backslash only separates components in
/// drive-letter paths.
pub fn base_name(path: &str) -> &str {
    let separators: &[char] = if has_drive_letter(path) {
        &['/', '\\']
    } else {
        &['/']
    };

    let trimmed = path.trim_end_matches(separators);
    match trimmed.rfind(separators) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_characters_are_untouched() {
        let path = "C:/Videos/My-Clip_01.v2~final.mp4";
        assert_eq!(percent_encode_path(path), path);
        assert_eq!(to_file_uri(path), format!("file:///{}", path));
    }

    #[test]
    fn test_unsafe_bytes_use_uppercase_hex() {
        assert_eq!(percent_encode_path("a b#c"), "a%20b%23c");
        assert_eq!(percent_encode_path("é"), "%C3%A9");
        assert_eq!(percent_encode_path("100%"), "100%25");
    }

    #[test]
    fn test_unix_paths_get_three_slashes() {
        assert_eq!(
            to_file_uri("/home/user/My Videos/a.mp4"),
            "file:///home/user/My%20Videos/a.mp4"
        );
    }

    #[test]
    fn test_drive_letter_normalization() {
        assert_eq!(normalize_separators(r"c:\Videos\a.mp4"), "C:/Videos/a.mp4");
        assert_eq!(
            to_file_uri(r"d:\Films\Big Movie.mkv"),
            "file:///D:/Films/Big%20Movie.mkv"
        );
        assert_eq!(normalize_separators("/tmp/c:/x"), "/tmp/c:/x");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/a/b/clip.mp4"), "clip.mp4");
        assert_eq!(base_name(r"C:\a\clip.mp4"), "clip.mp4");
        assert_eq!(base_name("clip.mp4"), "clip.mp4");
        assert_eq!(base_name("/a/dir/"), "dir");
    }

    #[test]
    fn test_backslash_is_a_filename_byte_outside_drive_paths() {
        assert_eq!(normalize_separators(r"/v/a\b.mp4"), r"/v/a\b.mp4");
        assert_eq!(to_file_uri(r"/v/a\b.mp4"), "file:///v/a%5Cb.mp4");
        assert_eq!(base_name(r"/v/a\b.mp4"), r"a\b.mp4");
        assert!(has_drive_letter("c:/x"));
        assert!(!has_drive_letter("/c:/x"));
    }
}
