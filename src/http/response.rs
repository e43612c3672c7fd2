use crate::resolve::Outcome;

const HTTP_VERSION: &str = "HTTP/1.1";
const OCTET_STREAM: &str = "application/octet-stream";

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): file served
/// - `Found` (302): target redirected to another server
/// - `BadRequest` (400): malformed request
/// - `NotFound` (404): no file and no redirect
/// - `InternalServerError` (500): filesystem failure
/// - `NotImplemented` (501): method other than GET/HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 Found
    Found,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use portico::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Found => 302,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "Found",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// The one header that describes the payload or its location.
///
/// A response carries at most one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityHeader {
    ContentType(String),
    Location(String),
}

/// A complete HTTP response, built once and handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP version of the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// `Content-type` or `Location`
    pub entity_header: Option<EntityHeader>,
    /// Value of `Content-length`; for HEAD this is the size of the omitted body
    pub content_length: usize,
    /// Body bytes, absent for HEAD and for every non-200 response
    pub body: Option<Vec<u8>>,
    /// Close the connection once this response is written
    pub close: bool,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("application/octet-stream")
///     .body(b"hi".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    entity_header: Option<EntityHeader>,
    content_length: Option<usize>,
    body: Option<Vec<u8>>,
    close: bool,
}

impl ResponseBuilder {
    /// Creates a new keep-alive response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            entity_header: None,
            content_length: None,
            body: None,
            close: false,
        }
    }

    /// Sets `Content-type`, replacing any `Location`.
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.entity_header = Some(EntityHeader::ContentType(value.into()));
        self
    }

    /// Sets `Location`, replacing any `Content-type`.
    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.entity_header = Some(EntityHeader::Location(value.into()));
        self
    }

    /// Overrides the reported content length.
    pub fn content_length(mut self, len: usize) -> Self {
        self.content_length = Some(len);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn close(mut self, close: bool) -> Self {
        self.close = close;
        self
    }

    /// Builds the final Response.
    ///
    /// Content length defaults to the body size, or 0 without a body.
    pub fn build(self) -> Response {
        let content_length = self
            .content_length
            .unwrap_or_else(|| self.body.as_ref().map_or(0, Vec::len));

        Response {
            version: HTTP_VERSION.to_string(),
            status: self.status,
            entity_header: self.entity_header,
            content_length,
            body: self.body,
            close: self.close,
        }
    }
}

impl Response {
    /// Maps a resolution outcome to its response.
    ///
    /// `head` drops the body but keeps the headers describing it. 400 and 501
    /// always close the connection; other outcomes close only if the client
    /// asked to.
    pub fn from_outcome(outcome: Outcome, head: bool, client_close: bool) -> Self {
        match outcome {
            Outcome::ServeFile(file) => {
                let builder = ResponseBuilder::new(StatusCode::Ok)
                    .content_type(OCTET_STREAM)
                    .content_length(file.contents.len())
                    .close(client_close);

                if head {
                    builder.build()
                } else {
                    builder.body(file.contents).build()
                }
            }
            Outcome::Redirect(url) => ResponseBuilder::new(StatusCode::Found)
                .location(url)
                .close(client_close)
                .build(),
            Outcome::NotFound => ResponseBuilder::new(StatusCode::NotFound)
                .close(client_close)
                .build(),
            Outcome::InternalError => ResponseBuilder::new(StatusCode::InternalServerError)
                .close(client_close)
                .build(),
            Outcome::NotImplemented => Self::not_implemented(),
            Outcome::MalformedRequest => Self::bad_request(),
        }
    }

    /// Creates a closing 400 Bad Request response.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .close(true)
            .build()
    }

    /// Creates a closing 501 Not Implemented response.
    pub fn not_implemented() -> Self {
        ResponseBuilder::new(StatusCode::NotImplemented)
            .close(true)
            .build()
    }

    /// Value of the `Connection` header.
    pub fn connection(&self) -> &'static str {
        if self.close { "close" } else { "keep-alive" }
    }
}
