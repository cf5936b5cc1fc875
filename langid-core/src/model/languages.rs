//! Language list: a list of strings nested inside a one-element list of
//! strings

use super::reader::{ByteReader, ReadError, WriteModelExt};
use crate::error::{ModelError, Result};
use std::io::{self, Write};

/// Parse a serialized list of strings; trailing bytes are rejected
pub fn parse_list_of_strings(bytes: &[u8]) -> std::result::Result<Vec<String>, ReadError> {
    let mut reader = ByteReader::new(bytes);
    let count = reader.read_len("element count")?;
    // Each element needs at least its 4-byte length prefix.
    if count > reader.remaining() / 4 {
        return Err(ReadError::Overlong {
            what: "list of strings",
            declared: count,
            remaining: reader.remaining(),
        });
    }
    let elements = (0..count)
        .map(|_| reader.read_string("element"))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    reader.finish()?;
    Ok(elements)
}

/// Serialize a list of strings
pub fn write_list_of_strings<W: Write>(mut wtr: W, elements: &[impl AsRef<str>]) -> io::Result<()> {
    wtr.write_len(elements.len(), "list of strings")?;
    for element in elements {
        wtr.write_string(element.as_ref(), "list element")?;
    }
    Ok(())
}

/// Parse the language map: the outer list must hold exactly one record,
/// whose bytes are the list of language codes
pub fn parse_language_map(bytes: &[u8]) -> Result<Vec<String>> {
    let malformed = |e: ReadError| ModelError::MalformedLanguageList(e.to_string());

    // The outer list is read without decoding its element as text: the
    // record is itself a serialized list.
    let mut reader = ByteReader::new(bytes);
    let records = reader.read_len("record count").map_err(malformed)?;
    if records != 1 {
        return Err(ModelError::MalformedLanguageList(format!(
            "expected exactly 1 record, found {records}"
        )));
    }
    let record = reader.read_blob("record").map_err(malformed)?;
    reader.finish().map_err(malformed)?;

    parse_list_of_strings(record).map_err(malformed)
}

/// Serialize a language map in the doubly wrapped form read by
/// [`parse_language_map`]
pub fn write_language_map<W: Write>(mut wtr: W, languages: &[impl AsRef<str>]) -> io::Result<()> {
    let mut record = Vec::new();
    write_list_of_strings(&mut record, languages)?;
    wtr.write_len(1, "record count")?;
    wtr.write_blob(&record, "record")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language_map(languages: &[&str]) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_language_map(&mut bytes, languages).unwrap();
        bytes
    }

    #[test]
    fn test_parse_language_map() {
        let bytes = language_map(&["en", "fr", "zh-Hant"]);
        assert_eq!(parse_language_map(&bytes).unwrap(), vec!["en", "fr", "zh-Hant"]);
    }

    #[test]
    fn test_outer_list_must_have_one_record() {
        let mut bytes = Vec::new();
        write_list_of_strings(&mut bytes, &["a", "b"]).unwrap();
        let err = parse_language_map(&bytes).unwrap_err();
        assert!(err.to_string().contains("exactly 1 record, found 2"));

        let mut empty = Vec::new();
        write_list_of_strings(&mut empty, &[] as &[&str]).unwrap();
        assert!(parse_language_map(&empty).is_err());
    }

    #[test]
    fn test_inner_record_must_be_a_list() {
        // One record whose bytes are not a well-formed list.
        let mut bytes = Vec::new();
        write_list_of_strings(&mut bytes, &["not a list"]).unwrap();
        assert!(matches!(
            parse_language_map(&bytes),
            Err(ModelError::MalformedLanguageList(_))
        ));
    }

    #[test]
    fn test_truncated_map() {
        let bytes = language_map(&["en", "fr"]);
        for len in 0..bytes.len() {
            assert!(parse_language_map(&bytes[..len]).is_err(), "len {len}");
        }
    }

    #[test]
    fn test_element_count_beyond_data() {
        let mut bytes = Vec::new();
        bytes.write_len(u32::MAX as usize, "count").unwrap();
        assert!(parse_list_of_strings(&bytes).is_err());
    }
}
