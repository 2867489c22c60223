use tokio::io::AsyncWrite;

use crate::http::error::WriteError;
use crate::http::headers::Headers;
use crate::http::writer::ResponseWriter;

/// HTTP status codes supported by the server.
///
/// Common HTTP status codes used in responses:
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource created successfully
/// - `NoContent` (204): Successful request with no content
/// - `BadRequest` (400): Malformed request
/// - `NotFound` (404): Resource not found
/// - `MethodNotAllowed` (405): HTTP method not supported
/// - `InternalServerError` (500): Server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// The full status line including the trailing CRLF.
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}\r\n", self.as_u16(), self.reason_phrase())
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = WriteError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Ok(match code {
            200 => StatusCode::Ok,
            201 => StatusCode::Created,
            204 => StatusCode::NoContent,
            400 => StatusCode::BadRequest,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            500 => StatusCode::InternalServerError,
            other => return Err(WriteError::UnsupportedStatus(other)),
        })
    }
}

/// Headers for a fixed-length `text/html` body on a closing connection.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.overwrite("Content-length", content_len.to_string());
    headers.overwrite("Connection", "close");
    headers.overwrite("Content-Type", "text/html");
    headers
}

/// Default headers switched to chunked framing.
///
/// Trailers are only legal when announced up front, so every name in
/// `trailers` is listed in a `Trailer` header.
pub fn chunked_headers(trailers: &[&str]) -> Headers {
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.overwrite("Transfer-Encoding", "chunked");
    if !trailers.is_empty() {
        headers.overwrite("Trailer", trailers.join(", "));
    }
    headers
}

/// A fully buffered response.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header on top of the defaults.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Starts from [`default_headers`] for the body length, then applies
    /// the explicit headers in order.
    pub fn build(self) -> Response {
        let mut headers = default_headers(self.body.len());
        for (k, v) in self.headers {
            headers.overwrite(&k, v);
        }
        Response {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    pub fn bad_request() -> Self {
        Self::page(StatusCode::BadRequest, "The request could not be parsed.")
    }

    pub fn internal_error() -> Self {
        Self::page(StatusCode::InternalServerError, "The server failed to handle the request.")
    }

    /// Minimal HTML page for `status`.
    pub fn page(status: StatusCode, message: &str) -> Self {
        let title = format!("{} {}", status.as_u16(), status.reason_phrase());
        let body = format!(
            "<html>\n<head>\n<title>{title}</title>\n</head>\n<body>\n<h1>{}</h1>\n<p>{message}</p>\n</body>\n</html>\n",
            status.reason_phrase()
        );
        ResponseBuilder::new(status).body(body).build()
    }

    /// Writes status line, headers and body through `writer`.
    pub async fn write_to<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), WriteError>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_status_line(self.status).await?;
        writer.write_headers(&self.headers).await?;
        writer.write_body(&self.body).await?;
        Ok(())
    }
}
