//! File reading and text decoding helpers.

use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a template file and decode it to text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let hint = extract_charset(&bytes);
    Ok(decode_text(&bytes, hint.as_deref()).into_owned())
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset>` or an XML declaration)
/// 3. Falls back to Windows-1252 (common in older hand-edited templates)
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find a declared charset in the first kilobyte of a file.
///
/// Recognizes `<meta charset="...">`, `content="text/html; charset=..."` and
/// `<?xml ... encoding="..."?>`.
pub fn extract_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head).to_ascii_lowercase();

    let (key, start) = ["charset=", "encoding="]
        .iter()
        .filter_map(|key| text.find(key).map(|pos| (*key, pos)))
        .min_by_key(|(_, pos)| *pos)?;

    let value = text[start + key.len()..].trim_start_matches(['"', '\'']);
    let end = value
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(value.len());
    let label = &value[..end];
    (!label.is_empty()).then(|| label.to_string())
}
