use std::borrow::Cow;

use crate::error::Error;
use crate::model::Entry;

/// Parse raw mapping-table text into ordered entries.
///
/// Lines are split on any newline style and trimmed; blank lines are
/// skipped. Each remaining line must split on the literal `separator` into
/// exactly a pattern and a value, both trimmed. Entry order is table-line
/// order and is semantically significant for resolution.
pub fn parse_table(input: &str, separator: &str) -> Result<Vec<Entry>, Error> {
    let normalized = normalize_newlines(input);
    let mut entries = Vec::new();

    for (idx, raw_line) in normalized.split('\n').enumerate() {
        let line_num = idx as u32 + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut segments = line.split(separator);
        let (Some(pattern), Some(value), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(Error::MalformedTableLine {
                line: line_num,
                text: line.to_owned(),
                separator: separator.to_owned(),
            });
        };

        entries.push(Entry {
            pattern: pattern.trim().to_owned(),
            value: value.trim().to_owned(),
            line: line_num,
        });
    }

    Ok(entries)
}

fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}
