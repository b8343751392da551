//! Shell-style wildcard patterns for library file names.

use std::fmt;

use regex::Regex;

use super::error::CollectError;

/// Library names collected when none are configured.
pub const DEFAULT_LIBRARY_PATTERNS: [&str; 3] =
    ["libopenslide.so", "libopenslide.dylib", "libopenslide*.dll"];

/// A file name pattern where `*` matches any run of characters and `?`
/// matches exactly one. Everything else matches literally.
///
/// Patterns match whole file names, never directory components.
#[derive(Debug, Clone)]
pub struct LibraryPattern {
    raw: String,
    regex: Regex,
}

impl LibraryPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::InvalidPattern`] for empty patterns and
    /// patterns containing `/` or `\`.
    pub fn new(pattern: &str) -> Result<Self, CollectError> {
        if pattern.trim().is_empty() {
            return Err(CollectError::invalid_pattern(pattern, "pattern is empty"));
        }
        if pattern.contains(['/', '\\']) {
            return Err(CollectError::invalid_pattern(
                pattern,
                "patterns match file names and cannot contain path separators",
            ));
        }

        let regex = Regex::new(&wildcard_to_regex(pattern))
            .map_err(|e| CollectError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true when the whole `file_name` matches.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

impl fmt::Display for LibraryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compiles a list of raw patterns, failing on the first invalid one.
///
/// # Errors
///
/// Returns the first [`CollectError::InvalidPattern`].
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<LibraryPattern>, CollectError> {
    patterns
        .iter()
        .map(|p| LibraryPattern::new(p.as_ref()))
        .collect()
}

/// The default pattern set.
///
/// # Errors
///
/// Never fails in practice; the defaults are valid patterns.
pub fn default_patterns() -> Result<Vec<LibraryPattern>, CollectError> {
    compile_patterns(&DEFAULT_LIBRARY_PATTERNS)
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out.push('$');
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_matches_exact_name_only() {
        let pattern = LibraryPattern::new("libopenslide.so").unwrap();
        assert!(pattern.matches("libopenslide.so"));
        assert!(!pattern.matches("libopenslide.so.1"));
        assert!(!pattern.matches("xlibopenslide.so"));
        assert!(!pattern.matches("libopenslideXso"), "dot is literal");
    }

    #[test]
    fn test_star_pattern() {
        let pattern = LibraryPattern::new("libopenslide*.dll").unwrap();
        assert!(pattern.matches("libopenslide-1.dll"));
        assert!(pattern.matches("libopenslide.dll"));
        assert!(!pattern.matches("libopenslide-1.dll.a"));
        assert!(!pattern.matches("openslide-1.dll"));
    }

    #[test]
    fn test_question_mark_matches_single_char() {
        let pattern = LibraryPattern::new("lib?.so").unwrap();
        assert!(pattern.matches("liba.so"));
        assert!(!pattern.matches("lib.so"));
        assert!(!pattern.matches("libab.so"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = LibraryPattern::new("lib+(x)[1].so").unwrap();
        assert!(pattern.matches("lib+(x)[1].so"));
        assert!(!pattern.matches("libx1.so"));
    }

    #[test]
    fn test_invalid_patterns_rejected() {
        assert!(matches!(
            LibraryPattern::new(""),
            Err(CollectError::InvalidPattern { .. })
        ));
        assert!(matches!(
            LibraryPattern::new("lib/libopenslide.so"),
            Err(CollectError::InvalidPattern { .. })
        ));
        assert!(matches!(
            LibraryPattern::new("bin\\x.dll"),
            Err(CollectError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_default_patterns_compile() {
        let patterns = default_patterns().unwrap();
        let raw: Vec<&str> = patterns.iter().map(LibraryPattern::as_str).collect();
        assert_eq!(raw, DEFAULT_LIBRARY_PATTERNS.to_vec());
    }
}
