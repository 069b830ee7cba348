// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Path helpers for asset keys.
//!
//! Asset keys always use `/` as separator, never start or end with one and
//! never contain empty segments.

/// Whether `c` separates path segments in a raw key.
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalizes an asset name: trims whitespace, unifies separators to `/` and
/// drops empty segments. Case is preserved. The operation is idempotent.
pub fn normalize_asset_name(raw: &str) -> String {
    segments(raw.trim(), usize::MAX).join("/")
}

/// Normalizes an asset name and folds its case, giving the form used as a cache key.
pub fn normalize_key(raw: &str) -> String {
    normalize_asset_name(raw).to_lowercase()
}

/// Splits a path into non-empty segments.
///
/// At most `limit` segments are returned; the last one keeps the remainder of
/// the path, separators included.
pub fn segments(path: &str, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = path.trim_matches(is_separator);

    while !rest.is_empty() && limit > 0 {
        if parts.len() + 1 == limit {
            parts.push(rest);
            break;
        }
        match rest.find(is_separator) {
            Some(index) => {
                parts.push(&rest[..index]);
                rest = rest[index..].trim_start_matches(is_separator);
            }
            None => {
                parts.push(rest);
                break;
            }
        }
    }

    parts
}

/// Whether the path is rooted (`/x`, `\x`, or a drive such as `C:`).
pub fn is_rooted(path: &str) -> bool {
    let path = path.trim();
    if path.starts_with(is_separator) {
        return true;
    }
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic()
    )
}

/// Whether the path contains characters that are never valid in an asset key.
pub fn has_invalid_characters(path: &str) -> bool {
    path.chars()
        .any(|c| c.is_control() || matches!(c, '<' | '>' | '|' | '"' | '*' | '?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unifies_separators() {
        assert_eq!(normalize_asset_name(" Data\\Fish/ "), "Data/Fish");
        assert_eq!(normalize_asset_name("//Maps//Town\\\\spring"), "Maps/Town/spring");
        assert_eq!(normalize_asset_name("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Data\\Fish", "/a//b/", "Characters/Dialogue/Abigail.fr-FR", "x"] {
            let once = normalize_asset_name(raw);
            assert_eq!(normalize_asset_name(&once), once);
            let key = normalize_key(raw);
            assert_eq!(normalize_key(&key), key);
        }
    }

    #[test]
    fn test_segments_with_limit_keeps_remainder() {
        assert_eq!(segments("Managed/mod.id/Data/Fish", 3), vec!["Managed", "mod.id", "Data/Fish"]);
        assert_eq!(segments("/Managed//mod.id", 3), vec!["Managed", "mod.id"]);
        assert_eq!(segments("a/b/c", usize::MAX), vec!["a", "b", "c"]);
        assert_eq!(segments("a/b/c", 1), vec!["a/b/c"]);
        assert!(segments("", 3).is_empty());
    }

    #[test]
    fn test_rooted_and_invalid_paths() {
        assert!(is_rooted("/etc/passwd"));
        assert!(is_rooted("C:\\Games"));
        assert!(!is_rooted("assets/fish.png"));
        assert!(has_invalid_characters("fish|chips"));
        assert!(has_invalid_characters("a\0b"));
        assert!(!has_invalid_characters("Data/Fish.fr-FR"));
    }
}
