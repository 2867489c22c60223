use std::fmt;

use crate::http::error::ParseError;
use crate::http::headers::{Headers, find_crlf};

/// HTTP request methods.
///
/// Any token made only of uppercase ASCII letters is accepted; the
/// common verbs get their own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other uppercase token
    Extension(String),
}

impl Method {
    /// Parses a method token.
    ///
    /// Returns `None` unless `s` is non-empty and made only of uppercase
    /// ASCII letters.
    ///
    /// ```
    /// # use rawhttp::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Some(Method::GET));
    /// assert_eq!(Method::parse("PURGE"), Some(Method::Extension("PURGE".into())));
    /// assert_eq!(Method::parse("get"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return None;
        }
        Some(match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Extension(other.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// Request target exactly as sent, e.g. `/search?q=rust`
    pub target: String,
    /// Protocol version without the `HTTP/` prefix; always `"1.1"`
    pub version: String,
}

impl RequestLine {
    /// Parses `METHOD SP TARGET SP HTTP/1.1` (without the CRLF).
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();
        let [method, target, version] = parts.as_slice() else {
            return Err(ParseError::Format(format!("request line {line:?}")));
        };

        let method = Method::parse(method)
            .ok_or_else(|| ParseError::Format(format!("method {method:?}")))?;

        match version.split('/').collect::<Vec<_>>()[..] {
            ["HTTP", "1.1"] => {}
            _ => return Err(ParseError::Version(version.to_string())),
        }

        Ok(Self {
            method,
            target: target.to_string(),
            version: "1.1".to_string(),
        })
    }
}

/// Where the incremental parser currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// A request reconstructed from the wire.
///
/// Built incrementally through [`Request::parse`]; the driving loop in
/// [`parser`](crate::http::parser) hands it out only once it is done.
#[derive(Debug, Clone)]
pub struct Request {
    pub request_line: RequestLine,
    /// Header names are stored lower-cased
    pub headers: Headers,
    /// Exactly `Content-Length` bytes once parsing is done
    pub body: Vec<u8>,
    state: ParseState,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            request_line: RequestLine {
                method: Method::GET,
                target: String::new(),
                version: String::new(),
            },
            headers: Headers::new(),
            body: Vec::new(),
            state: ParseState::Initialized,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    pub fn method(&self) -> &Method {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Declared body length, `Ok(None)` when the header is absent.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.header("Content-Length")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }

    /// Feeds `data` to the state machine until it stops making progress.
    ///
    /// Returns how many bytes of `data` were consumed; the caller must not
    /// present those bytes again. A finished request cannot be re-entered.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }
        let mut total = 0;
        while self.state != ParseState::Done {
            let n = self.parse_single(&data[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Initialized => {
                let Some(idx) = find_crlf(data) else {
                    return Ok(0);
                };
                let line = String::from_utf8_lossy(&data[..idx]);
                self.request_line = RequestLine::parse(&line)?;
                self.state = ParseState::ParsingHeaders;
                Ok(idx + 2)
            }

            ParseState::ParsingHeaders => {
                let (n, done) = self.headers.parse(data)?;
                if done {
                    self.state = ParseState::ParsingBody;
                }
                Ok(n)
            }

            ParseState::ParsingBody => {
                let Some(declared) = self.content_length()? else {
                    self.state = ParseState::Done;
                    return Ok(0);
                };

                let remaining = declared - self.body.len();
                if data.len() > remaining {
                    return Err(ParseError::Framing {
                        received: self.body.len() + data.len(),
                        declared,
                    });
                }

                self.body.extend_from_slice(data);
                if self.body.len() == declared {
                    self.state = ParseState::Done;
                }
                Ok(data.len())
            }

            ParseState::Done => Err(ParseError::AlreadyDone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_stops_at_each_phase() {
        let mut req = Request::new();
        let data = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";

        assert_eq!(req.parse_single(data).unwrap(), 16);
        assert_eq!(req.state(), ParseState::ParsingHeaders);
        assert_eq!(req.parse_single(&data[16..]).unwrap(), 9);
        assert_eq!(req.parse_single(&data[25..]).unwrap(), 2);
        assert_eq!(req.state(), ParseState::ParsingBody);
        assert_eq!(req.parse_single(&[]).unwrap(), 0);
        assert!(req.is_done());
    }

    #[test]
    fn zero_length_body_completes_without_input() {
        let mut req = Request::new();
        let n = req
            .parse(b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n")
            .unwrap();
        assert_eq!(n, 38);
        assert!(req.is_done());
        assert!(req.body.is_empty());
    }
}
