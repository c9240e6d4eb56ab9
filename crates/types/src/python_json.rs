//! JSON text encoding compatible with the SOAR script runner.
//!
//! The backend decodes `ScriptParametersEntityFields` with the same rules it
//! used to encode them historically: `", "` between items, `": "` between a
//! key and its value, and every character outside printable ASCII escaped as
//! a lowercase `\uXXXX` sequence (UTF-16 surrogate pairs above the BMP).

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Serialize a value to a JSON string using [`ScriptJsonFormatter`].
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buffer, ScriptJsonFormatter);
    value.serialize(&mut serializer)?;
    // The formatter only ever emits ASCII.
    String::from_utf8(buffer).map_err(|error| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, error)))
}

/// Compact-with-spaces formatter that escapes all non-printable-ASCII characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptJsonFormatter;

impl Formatter for ScriptJsonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, character) in fragment.char_indices() {
            if is_printable_ascii(character) {
                continue;
            }
            if start < index {
                writer.write_all(&fragment.as_bytes()[start..index])?;
            }
            let mut units = [0u16; 2];
            for unit in character.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + character.len_utf8();
        }
        if start < fragment.len() {
            writer.write_all(&fragment.as_bytes()[start..])?;
        }
        Ok(())
    }
}

fn is_printable_ascii(character: char) -> bool {
    (' '..='~').contains(&character)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::{Value, json};

    #[test]
    fn uses_spaced_separators() {
        let mut map = IndexMap::new();
        map.insert("Detector ID", json!("d-1"));
        map.insert("Values", json!(["a", "b"]));
        map.insert("Enabled", json!(true));
        assert_eq!(
            to_string(&map).unwrap(),
            r#"{"Detector ID": "d-1", "Values": ["a", "b"], "Enabled": true}"#
        );
    }

    #[test]
    fn escapes_non_ascii_with_lowercase_hex() {
        assert_eq!(to_string(&json!("caf\u{e9}")).unwrap(), r#""caf\u00e9""#);
        assert_eq!(to_string(&json!("\u{201c}x\u{201d}")).unwrap(), r#""\u201cx\u201d""#);
        assert_eq!(to_string(&json!("\u{1F600}")).unwrap(), r#""\ud83d\ude00""#);
        assert_eq!(to_string(&json!("a\u{7f}b")).unwrap(), r#""a\u007fb""#);
    }

    #[test]
    fn keeps_standard_escapes() {
        assert_eq!(to_string(&json!("line\n\"q\"\\")).unwrap(), r#""line\n\"q\"\\""#);
    }

    #[test]
    fn empty_containers_have_no_padding() {
        assert_eq!(to_string(&json!({})).unwrap(), "{}");
        assert_eq!(to_string(&json!([])).unwrap(), "[]");
        assert_eq!(to_string(&json!({"k": {}})).unwrap(), r#"{"k": {}}"#);
    }

    #[test]
    fn output_round_trips_through_serde_json() {
        let value = json!({"Query": {"filters": ["ip = 1.2.3.4"]}, "Note": "r\u{e9}sum\u{e9}"});
        let encoded = to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
