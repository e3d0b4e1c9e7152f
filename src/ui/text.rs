//! Sanitization of record-sourced text before terminal display.
//!
//! Terminal emulators interpret escape sequences that can rewrite displayed
//! content, manipulate the clipboard, or alter terminal state. Every string
//! that originates in a fetched record goes through [`sanitize`] before it is
//! rendered.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Strip escape sequences and control characters from `input`.
///
/// Card fields are single-line, so every control character goes, including
/// newlines and tabs. Printable text - markup-looking characters like `<` or
/// `&` included - passes through untouched; the card renderer treats it as
/// literal text, never as markup.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn sanitize(input: &str) -> Cow<'_, str> {
  if !input.chars().any(char::is_control) {
    return Cow::Borrowed(input);
  }

  let mut result = String::with_capacity(input.len());
  let mut chars = input.chars().peekable();

  while let Some(c) = chars.next() {
    if c == ESC {
      skip_escape_sequence(&mut chars);
    } else if !c.is_control() {
      result.push(c);
    }
  }

  Cow::Owned(result)
}

/// Consume the body of an escape sequence whose ESC was just read.
fn skip_escape_sequence(chars: &mut Peekable<Chars>) {
  match chars.peek() {
    // CSI: parameters and intermediates, terminated by 0x40-0x7e
    Some('[') => {
      chars.next();
      for c in chars.by_ref() {
        if ('\x40'..='\x7e').contains(&c) {
          break;
        }
      }
    }
    // OSC: terminated by BEL or ESC-backslash
    Some(']') => {
      chars.next();
      while let Some(c) = chars.next() {
        if c == BEL {
          break;
        }
        if c == ESC {
          chars.next();
          break;
        }
      }
    }
    // Two-character sequence
    Some(_) => {
      chars.next();
    }
    None => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clean_text_passes_borrowed() {
    let text = "Leanne Graham";
    assert!(matches!(sanitize(text), Cow::Borrowed(_)));
    assert_eq!(sanitize(text), text);
  }

  #[test]
  fn test_markup_characters_stay_literal() {
    // No markup language in the terminal renderer - these are plain text
    let text = r#"<script>&"'x > y"#;
    assert_eq!(sanitize(text), text);
  }

  #[test]
  fn test_strips_csi_sequences() {
    assert_eq!(sanitize("Hello\x1b[2JWorld"), "HelloWorld");
    assert_eq!(sanitize("\x1b[31mred\x1b[0m"), "red");
  }

  #[test]
  fn test_strips_osc_sequences() {
    assert_eq!(sanitize("a\x1b]0;title\x07b"), "ab");
    assert_eq!(sanitize("a\x1b]8;;http://x\x1b\\b"), "ab");
  }

  #[test]
  fn test_strips_control_characters() {
    assert_eq!(sanitize("a\nb\tc\rd\x00e"), "abcde");
    assert_eq!(sanitize("a\x7fb"), "ab");
  }

  #[test]
  fn test_trailing_escape() {
    assert_eq!(sanitize("abc\x1b"), "abc");
    assert_eq!(sanitize("abc\x1b["), "abc");
  }
}
