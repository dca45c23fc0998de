//! String escaping for the streaming JSON engine.

use std::io;

use serde_json::ser::Formatter;

/// How non-ASCII text is written inside JSON strings.
///
/// Quotes, backslashes and control characters are always escaped by
/// `serde_json` itself; this only decides what happens to everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Write non-ASCII characters (emoji, CJK, ...) as-is.
    #[default]
    Relaxed,
    /// Write every non-ASCII character, the HTML-sensitive `<`, `>`, `&`, `'`,
    /// `+` and the backtick as `\uXXXX`. Surrogate pairs above U+FFFF.
    Strict,
}

/// Wraps another formatter and applies an [`Escaping`] policy to string
/// fragments. Layout (compact or pretty) is left to the inner formatter.
#[derive(Debug, Clone)]
pub struct EscapingFormatter<F> {
    inner: F,
    escaping: Escaping,
}

impl<F: Formatter> EscapingFormatter<F> {
    pub fn new(inner: F, escaping: Escaping) -> Self {
        Self { inner, escaping }
    }
}

impl<F: Formatter> Formatter for EscapingFormatter<F> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        match self.escaping {
            Escaping::Relaxed => self.inner.write_string_fragment(writer, fragment),
            Escaping::Strict => write_strict_fragment(writer, fragment),
        }
    }
}

fn needs_strict_escape(ch: char) -> bool {
    !ch.is_ascii() || matches!(ch, '<' | '>' | '&' | '\'' | '+' | '`')
}

fn write_strict_fragment<W: ?Sized + io::Write>(writer: &mut W, fragment: &str) -> io::Result<()> {
    let mut start = 0;
    for (i, ch) in fragment.char_indices() {
        if !needs_strict_escape(ch) {
            continue;
        }
        if start < i {
            writer.write_all(fragment[start..i].as_bytes())?;
        }
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            writer.write_all(format!("\\u{:04X}", unit).as_bytes())?;
        }
        start = i + ch.len_utf8();
    }
    if start < fragment.len() {
        writer.write_all(fragment[start..].as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::ser::{CompactFormatter, PrettyFormatter};

    fn render<T: Serialize>(value: &T, escaping: Escaping) -> String {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(
            &mut buf,
            EscapingFormatter::new(CompactFormatter, escaping),
        );
        value.serialize(&mut ser).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn relaxed_keeps_emoji_and_cjk() {
        assert_eq!(render(&"a😀b日本", Escaping::Relaxed), "\"a😀b日本\"");
    }

    #[test]
    fn strict_escapes_astral_as_surrogate_pair() {
        assert_eq!(render(&"a😀b", Escaping::Strict), "\"a\\uD83D\\uDE00b\"");
    }

    #[test]
    fn strict_escapes_bmp_and_html_chars() {
        assert_eq!(render(&"é<&>", Escaping::Strict), "\"\\u00E9\\u003C\\u0026\\u003E\"");
    }

    #[test]
    fn quotes_and_control_chars_escaped_in_both_modes() {
        for escaping in [Escaping::Relaxed, Escaping::Strict] {
            assert_eq!(render(&"q\"\n", escaping), "\"q\\\"\\n\"");
        }
    }

    #[test]
    fn object_keys_are_escaped_too() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("ключ", 1);
        assert_eq!(render(&map, Escaping::Strict), "{\"\\u043A\\u043B\\u044E\\u0447\":1}");
    }

    #[test]
    fn layout_comes_from_inner_formatter() {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(
            &mut buf,
            EscapingFormatter::new(PrettyFormatter::new(), Escaping::Relaxed),
        );
        vec![1, 2].serialize(&mut ser).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[\n  1,\n  2\n]");
    }
}
