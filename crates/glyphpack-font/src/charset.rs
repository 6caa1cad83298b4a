//! Character set files.
//!
//! A charset file lists the characters a game needs. It is UTF-8 text where
//! `#` starts a comment and tokens are separated by whitespace. A token of
//! the form `U+0041` adds one code point and `U+0041..U+005A` adds an
//! inclusive range; any other token adds each of its characters.
//!
//! ```text
//! # Latin letters and digits
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ abcdefghijklmnopqrstuvwxyz 0123456789
//! U+0020            # space
//! U+00C0..U+00FF    # Latin-1 letters
//! ```

use std::path::Path;

use glyphpack_core::alloc::HashSet;

use crate::error::{CharsetError, CharsetResult};

/// Read and parse a charset file.
pub fn read_charset(path: impl AsRef<Path>) -> CharsetResult<HashSet<u32>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| CharsetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = parse_charset(&text)?;
    tracing::debug!("Read {} code points from {}", set.len(), path.display());
    Ok(set)
}

/// Parse the contents of a charset file.
pub fn parse_charset(text: &str) -> CharsetResult<HashSet<u32>> {
    let mut set = HashSet::new();
    for (index, line) in text.lines().enumerate() {
        let content = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        };
        for token in content.split_whitespace() {
            if has_code_point_prefix(token) {
                let invalid = || CharsetError::InvalidCodePoint {
                    line: index + 1,
                    token: token.to_string(),
                };
                match token.split_once("..") {
                    Some((start, end)) => {
                        let start = parse_code_point(start).ok_or_else(invalid)?;
                        let end = parse_code_point(end).ok_or_else(invalid)?;
                        if start > end {
                            return Err(invalid());
                        }
                        set.extend(start..=end);
                    }
                    None => {
                        set.insert(parse_code_point(token).ok_or_else(invalid)?);
                    }
                }
            } else {
                set.extend(token.chars().map(u32::from));
            }
        }
    }
    Ok(set)
}

fn has_code_point_prefix(token: &str) -> bool {
    token.len() > 2 && token.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("u+"))
}

/// Parse `U+XXXX`, accepting only values in the Unicode code space.
fn parse_code_point(token: &str) -> Option<u32> {
    if !has_code_point_prefix(token) {
        return None;
    }
    let digits = &token[2..];
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    (value <= 0x10FFFF).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_characters() {
        let set = parse_charset("AB\u{e9}").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&0xe9));
    }

    #[test]
    fn test_code_points_and_ranges() {
        let set = parse_charset("U+0020 u+41..U+43 # ignored Z\n").unwrap();
        let mut values: Vec<u32> = set.into_iter().collect();
        values.sort_unstable();
        assert_eq!(values, vec![0x20, 0x41, 0x42, 0x43]);
    }

    #[test]
    fn test_invalid_code_point_names_line() {
        let err = parse_charset("abc\nU+XYZ\n").unwrap_err();
        assert!(matches!(err, CharsetError::InvalidCodePoint { line: 2, .. }));
        let err = parse_charset("U+50..U+40").unwrap_err();
        assert!(matches!(err, CharsetError::InvalidCodePoint { line: 1, .. }));
        let err = parse_charset("U+110000").unwrap_err();
        assert!(matches!(err, CharsetError::InvalidCodePoint { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_charset(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, CharsetError::Io { .. }));
    }
}
