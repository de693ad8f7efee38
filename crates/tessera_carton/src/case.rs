//! Identifier case conversions.
//!
//! These follow the rules the component runtime itself uses for prop and event names,
//! so a rename that crosses between `fooBar` and `foo-bar` lands on the spelling the
//! runtime would resolve.

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `foo-bar` -> `fooBar`. A dash followed by a word character is removed and the
/// character upper-cased.
pub fn camelize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if is_word_char(next) {
                    out.extend(next.to_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// `fooBar` -> `foo-bar`. An upper-case letter preceded by a word character gets a dash.
pub fn hyphenate(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(is_word_char) {
            out.push('-');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }
    out
}

/// `click` -> `Click`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `s` can be written as a bare property name (`/^[a-zA-Z_$][0-9a-zA-Z_$]*$/`).
pub fn is_simple_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("foo-bar"), "fooBar");
        assert_eq!(camelize("on-update-value"), "onUpdateValue");
        assert_eq!(camelize("foo--bar"), "foo-Bar");
        assert_eq!(camelize("plain"), "plain");
        assert_eq!(camelize("trailing-"), "trailing-");
    }

    #[test]
    fn test_hyphenate() {
        assert_eq!(hyphenate("fooBar"), "foo-bar");
        assert_eq!(hyphenate("FooBar"), "foo-bar");
        assert_eq!(hyphenate("foo-bar"), "foo-bar");
        assert_eq!(hyphenate("onClick"), "on-click");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("click"), "Click");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_is_simple_identifier() {
        assert!(is_simple_identifier("fooBar"));
        assert!(is_simple_identifier("$style"));
        assert!(is_simple_identifier("_x1"));
        assert!(!is_simple_identifier("foo-bar"));
        assert!(!is_simple_identifier("1abc"));
        assert!(!is_simple_identifier(""));
    }
}
