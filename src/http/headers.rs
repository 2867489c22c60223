use crate::http::error::ParseError;

const CRLF: &[u8] = b"\r\n";

/// Ordered header collection with ASCII case-insensitive names.
///
/// Entries serialize in insertion order. Parsed names are stored
/// lower-cased; names set through [`Headers::overwrite`] keep the
/// caller's spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one header line from the front of `data`.
    ///
    /// Returns the number of bytes consumed and whether the blank line
    /// ending the header block was reached. `(0, false)` means no full
    /// line is buffered yet.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::headers::Headers;
    /// let mut headers = Headers::new();
    /// let (n, done) = headers.parse(b"Host: localhost:42069\r\n\r\n").unwrap();
    /// assert_eq!((n, done), (23, false));
    /// assert_eq!(headers.get("HOST"), Some("localhost:42069"));
    /// ```
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(idx) = find_crlf(data) else {
            return Ok((0, false));
        };
        if idx == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = String::from_utf8_lossy(&data[..idx]);
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::Format(format!("header line {line:?}")))?;

        if name.len() != name.trim_end().len() {
            return Err(ParseError::Format(format!("header name {name:?}")));
        }
        let name = name.trim_start();
        if name.is_empty() {
            return Err(ParseError::Format(format!("header line {line:?}")));
        }
        if !name.bytes().all(is_token_char) {
            return Err(ParseError::InvalidCharacter(name.to_string()));
        }

        self.append(&name.to_ascii_lowercase(), value.trim());
        Ok((idx + CRLF.len(), false))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Inserts `value`, joining it onto an existing value with `", "`.
    pub fn append(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(i) => {
                let existing = &mut self.entries[i].1;
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Sets `name` to `value` regardless of any previous value.
    pub fn overwrite(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}
