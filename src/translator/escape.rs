//! Identifier escaping for emitted declarations.
//!
//! Source identifiers may contain characters the target runtime does not accept (`.ctor`,
//! generic arity markers, nested-type separators) or collide with its reserved words. The
//! escaping here is injective and reversible: `$` never appears unescaped in the output, so
//! every `$` starts an escape sequence and [`unescape_identifier`] can undo it.
//!
//! | Input                     | Output                  |
//! |---------------------------|-------------------------|
//! | `[A-Za-z0-9_]`            | unchanged               |
//! | leading digit             | `$3x`                   |
//! | other char `<= U+00FF`    | `$xx`                   |
//! | other char `<= U+FFFF`    | `$uxxxx`                |
//! | other char                | `$Uxxxxxx`              |
//! | reserved word             | `$$` prefix             |

use std::fmt::Write;

use crate::compiler::RESERVED_WORDS;

const RESERVED_PREFIX: &str = "$$";

fn escape_into(out: &mut String, text: &str, escape_periods: bool) {
    for (position, c) in text.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric() || c == '_' || (c == '.' && !escape_periods);
        if plain && !(position == 0 && c.is_ascii_digit()) {
            out.push(c);
            continue;
        }

        let code = u32::from(c);
        // Writing to a String cannot fail
        let _ = if code <= 0xFF {
            write!(out, "${code:02x}")
        } else if code <= 0xFFFF {
            write!(out, "$u{code:04x}")
        } else {
            write!(out, "$U{code:06x}")
        };
    }
}

/// Escapes one identifier; periods are escaped too.
///
/// # Examples
///
/// ```rust
/// use dotscript::translator::{escape_identifier, unescape_identifier};
///
/// assert_eq!(escape_identifier("Count"), "Count");
/// assert_eq!(escape_identifier(".ctor"), "$2ector");
/// assert_eq!(escape_identifier("List`1"), "List$601");
/// assert_eq!(escape_identifier("this"), "$$this");
/// assert_eq!(unescape_identifier("$2ector").as_deref(), Some(".ctor"));
/// ```
#[must_use]
pub fn escape_identifier(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    if identifier.is_empty() || RESERVED_WORDS.contains(&identifier) {
        out.push_str(RESERVED_PREFIX);
    }
    escape_into(&mut out, identifier, true);
    out
}

/// Escapes a dotted path segment by segment, keeping the periods.
///
/// Used for namespaces and type paths, where each segment is looked up on the previous one.
#[must_use]
pub fn escape_path(path: &str) -> String {
    path.split('.')
        .map(escape_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Reverses [`escape_identifier`].
///
/// Returns `None` if `escaped` is not something [`escape_identifier`] can produce.
#[must_use]
pub fn unescape_identifier(escaped: &str) -> Option<String> {
    let body = escaped.strip_prefix(RESERVED_PREFIX).unwrap_or(escaped);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let digits = match chars.clone().next()? {
            'u' => {
                chars.next();
                4
            }
            'U' => {
                chars.next();
                6
            }
            _ => 2,
        };
        let hex: String = chars.by_ref().take(digits).collect();
        if hex.len() != digits {
            return None;
        }
        out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_plain_identifiers_unchanged() {
        assert_eq!(escape_identifier("Value_1"), "Value_1");
        assert_eq!(escape_path("System.Collections.Generic"), "System.Collections.Generic");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(escape_identifier("Outer/Inner"), "Outer$2fInner");
        assert_eq!(escape_identifier("a$b"), "a$24b");
        assert_eq!(escape_identifier("1st"), "$31st");
        assert_eq!(escape_identifier("\u{e9}t\u{e9}"), "$e9t$e9");
        assert_eq!(escape_identifier("\u{3bb}"), "$u03bb");
        assert_eq!(escape_identifier("\u{1f600}"), "$U01f600");
        assert_eq!(escape_path("My.Ns.List`1"), "My.Ns.List$601");
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(escape_identifier("function"), "$$function");
        assert_eq!(escape_identifier("Function"), "Function");
        assert_eq!(unescape_identifier("$$function").as_deref(), Some("function"));
    }

    #[test]
    fn test_injective_and_reversible() {
        let inputs = [
            "", "a", "a.b", "a$2eb", "a$b", "$", "$$", "$24", "1", "_1", ".ctor", ".cctor",
            "get_Item", "op_Addition", "this", "$$this", "Outer/Inner", "List`1", "\u{3bb}x",
            "x\u{1f600}", "new", "$uffff", "$Ufffff",
        ];

        let mut seen = FxHashSet::default();
        for input in inputs {
            let escaped = escape_identifier(input);
            assert!(seen.insert(escaped.clone()), "collision on {escaped}");
            assert_eq!(unescape_identifier(&escaped).as_deref(), Some(input));
        }
    }

    #[test]
    fn test_malformed_escapes_rejected() {
        assert!(unescape_identifier("a$").is_none());
        assert!(unescape_identifier("a$4").is_none());
        assert!(unescape_identifier("a$zz").is_none());
        assert!(unescape_identifier("$ud800").is_none());
    }
}
