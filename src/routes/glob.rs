//! Shell-style URI patterns for route exclusion.
//!
//! Matching follows `fnmatch(3)` without flags: `*` spans `/`, `?` matches a
//! single character, `[...]` and `[!...]` are character classes and `\`
//! escapes the next character. Patterns are compiled once into anchored
//! regexes.

use regex::Regex;

/// A compiled exclusion pattern.
#[derive(Debug, Clone)]
pub struct UriGlob {
    pattern: String,
    regex: Regex,
}

impl UriGlob {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&glob_to_regex(pattern))?;
        Ok(UriGlob {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, uri: &str) -> bool {
        self.regex.is_match(uri)
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' if i + 1 < chars.len() => {
                i += 1;
                out.push_str(&regex::escape(&chars[i].to_string()));
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push('[');
                    let mut j = i + 1;
                    if chars[j] == '!' || chars[j] == '^' {
                        out.push('^');
                        j += 1;
                    }
                    while j < end {
                        let c = chars[j];
                        if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
                            out.push('\\');
                        }
                        out.push(c);
                        j += 1;
                    }
                    out.push(']');
                    i = end;
                }
                None => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

/// Index of the `]` closing the class opened at `start`, if the class is
/// well formed. A `]` right after `[` or `[!` is a literal member.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if j < chars.len() && (chars[j] == '!' || chars[j] == '^') {
        j += 1;
    }
    if j < chars.len() && chars[j] == ']' {
        j += 1;
    }
    while j < chars.len() {
        if chars[j] == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, uri: &str) -> bool {
        UriGlob::new(pattern).unwrap().matches(uri)
    }

    #[test]
    fn test_star_crosses_segments() {
        assert!(matches("api/internal/*", "api/internal/health/deep"));
        assert!(matches("*telescope*", "api/telescope/requests"));
        assert!(!matches("api/internal/*", "api/users"));
    }

    #[test]
    fn test_exact_and_question_mark() {
        assert!(matches("api/ping", "api/ping"));
        assert!(!matches("api/ping", "api/ping/more"));
        assert!(matches("api/v?/users", "api/v2/users"));
        assert!(!matches("api/v?/users", "api/v10/users"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("api/v[12]/*", "api/v1/users"));
        assert!(!matches("api/v[12]/*", "api/v3/users"));
        assert!(matches("api/v[!12]/*", "api/v3/users"));
        assert!(matches("api/[]]x", "api/]x"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("api/users.{id}", "api/users.{id}"));
        assert!(!matches("api/users.{id}", "api/usersX{id}"));
        assert!(matches(r"api/\*", "api/*"));
        assert!(!matches(r"api/\*", "api/x"));
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        assert!(matches("api/[oops", "api/[oops"));
    }
}
