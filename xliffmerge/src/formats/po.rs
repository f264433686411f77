//! Support for gettext `.po` catalogs.
//!
//! Only what the merge needs is modelled: a `msgid -> msgstr` mapping plus
//! the header fields. Plural messages contribute their first form
//! (`msgstr[0]`), obsolete (`#~`) messages are ignored and `msgctxt` does not
//! take part in keying.

use std::{collections::HashMap, io::BufRead};

use crate::{error::Error, placeholder::normalize_whitespace, traits::Parser};

/// Translations loaded from a PO file, keyed by normalized `msgid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    messages: HashMap<String, String>,
    headers: Vec<(String, String)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message. The key goes through the same whitespace
    /// normalization as derived XLIFF keys; a later insert replaces an
    /// earlier one.
    pub fn insert(&mut self, msgid: &str, msgstr: impl Into<String>) {
        self.messages.insert(normalize_whitespace(msgid), msgstr.into());
    }

    /// Looks up a translation by exact (already normalized) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// A header field from the `msgid ""` entry, e.g. `Language`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The catalog language from the `Language` header, if declared.
    pub fn language(&self) -> Option<&str> {
        self.header("Language").filter(|lang| !lang.is_empty())
    }

    fn set_headers(&mut self, raw: &str) {
        self.headers = raw
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for (msgid, msgstr) in iter {
            catalog.insert(msgid.as_ref(), msgstr);
        }
        catalog
    }
}

/// Which string a continuation line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Debug, Default)]
struct PendingMessage {
    msgid: Option<String>,
    msgstr: Option<String>,
    start_line: usize,
}

impl PendingMessage {
    fn is_complete(&self) -> bool {
        self.msgstr.is_some()
    }

    fn is_empty(&self) -> bool {
        self.msgid.is_none() && self.msgstr.is_none()
    }
}

impl Parser for Catalog {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut catalog = Catalog::new();
        let mut pending = PendingMessage::default();
        let mut field = Field::None;
        let mut started = false;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut catalog, &mut pending)?;
                field = Field::None;
                started = false;
                continue;
            }

            if trimmed.starts_with("#~") {
                continue;
            }

            if trimmed.starts_with('#') {
                // A comment after a finished message opens the next one.
                if pending.is_complete() {
                    flush(&mut catalog, &mut pending)?;
                    field = Field::None;
                    started = false;
                }
                continue;
            }

            if trimmed.starts_with('"') {
                let value = parse_po_string(trimmed, line_no)?;
                match field {
                    Field::None => {
                        return Err(Error::po_parse(
                            line_no,
                            "string continuation outside of a message",
                        ));
                    }
                    Field::Id => push_onto(&mut pending.msgid, &value),
                    Field::Str(0) => push_onto(&mut pending.msgstr, &value),
                    Field::Context | Field::IdPlural | Field::Str(_) => {}
                }
                continue;
            }

            let (keyword, rest) = trimmed
                .split_once(|c: char| c.is_whitespace())
                .unwrap_or((trimmed, ""));
            let value = parse_po_string(rest, line_no)?;

            match keyword {
                "msgctxt" | "msgid" if pending.is_complete() => {
                    flush(&mut catalog, &mut pending)?;
                    started = false;
                }
                _ => {}
            }
            if !started {
                pending.start_line = line_no;
                started = true;
            }

            field = match keyword {
                "msgctxt" => Field::Context,
                "msgid" => {
                    pending.msgid = Some(value);
                    Field::Id
                }
                "msgid_plural" => Field::IdPlural,
                "msgstr" => {
                    pending.msgstr = Some(value);
                    Field::Str(0)
                }
                other => match plural_index(other) {
                    Some(n) => {
                        if n == 0 {
                            pending.msgstr = Some(value);
                        }
                        Field::Str(n)
                    }
                    None => {
                        return Err(Error::po_parse(
                            line_no,
                            format!("unknown keyword `{}`", other),
                        ));
                    }
                },
            };
        }

        flush(&mut catalog, &mut pending)?;
        Ok(catalog)
    }
}

fn push_onto(slot: &mut Option<String>, value: &str) {
    if let Some(s) = slot {
        s.push_str(value);
    }
}

/// Parses `msgstr[N]` into `N`.
fn plural_index(keyword: &str) -> Option<usize> {
    keyword
        .strip_prefix("msgstr[")?
        .strip_suffix(']')?
        .trim()
        .parse()
        .ok()
}

fn flush(catalog: &mut Catalog, pending: &mut PendingMessage) -> Result<(), Error> {
    let message = std::mem::take(pending);
    if message.is_empty() {
        return Ok(());
    }
    match (message.msgid, message.msgstr) {
        (Some(msgid), Some(msgstr)) if msgid.is_empty() => {
            catalog.set_headers(&msgstr);
            Ok(())
        }
        (Some(msgid), Some(msgstr)) => {
            catalog.insert(&msgid, msgstr);
            Ok(())
        }
        (None, _) => Err(Error::po_parse(message.start_line, "msgstr without msgid")),
        (Some(_), None) => Err(Error::po_parse(message.start_line, "msgid without msgstr")),
    }
}

/// Parses a double-quoted PO string, resolving C escapes.
fn parse_po_string(s: &str, line: usize) -> Result<String, Error> {
    let s = s.trim();
    let inner = s
        .strip_prefix('"')
        .ok_or_else(|| Error::po_parse(line, format!("expected a quoted string, got `{}`", s)))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let rest: String = chars.collect();
                if !rest.trim().is_empty() {
                    return Err(Error::po_parse(
                        line,
                        format!("unexpected text after string: `{}`", rest.trim()),
                    ));
                }
                return Ok(out);
            }
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| Error::po_parse(line, "unterminated string"))?;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0C}'),
                    'v' => out.push('\u{0B}'),
                    'x' => {
                        let mut code = 0u32;
                        let mut digits = 0;
                        while let Some(d) = chars.peek().and_then(|c| c.to_digit(16)) {
                            code = code
                                .checked_mul(16)
                                .and_then(|c| c.checked_add(d))
                                .ok_or_else(|| Error::po_parse(line, "hex escape out of range"))?;
                            digits += 1;
                            chars.next();
                        }
                        if digits == 0 {
                            return Err(Error::po_parse(line, "`\\x` escape without hex digits"));
                        }
                        out.push(escaped_char(code, line)?);
                    }
                    '0'..='7' => {
                        let mut code = escaped.to_digit(8).unwrap_or_default();
                        for _ in 0..2 {
                            match chars.peek().and_then(|c| c.to_digit(8)) {
                                Some(d) => {
                                    code = code * 8 + d;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        out.push(escaped_char(code, line)?);
                    }
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }
    Err(Error::po_parse(line, "unterminated string"))
}

fn escaped_char(code: u32, line: usize) -> Result<char, Error> {
    char::from_u32(code)
        .ok_or_else(|| Error::po_parse(line, format!("invalid escaped character {:#x}", code)))
}
