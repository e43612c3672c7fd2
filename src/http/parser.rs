use crate::http::request::{Method, Request};
use std::collections::HashMap;

const HTTP_VERSION: &[u8] = b"HTTP/1.1";

/// Reasons a request block is rejected. Every variant is answered with
/// 400 Bad Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not terminated by an empty line
    InvalidRequest,
    InvalidRequestLine,
    InvalidVersion,
    InvalidHeader,
    DuplicateHeader(&'static str),
    /// Any content-length other than `0`
    InvalidContentLength,
}

/// Parses one complete request block, including its terminating empty line.
///
/// Accepted grammar:
///
/// ```text
/// request     = start-line *header-line CRLF
/// start-line  = method SP target SP "HTTP/1.1" CRLF
/// header-line = name ":" *SP value *SP CRLF
/// ```
///
/// `method`, `target`, `name` and `value` are non-empty byte runs without
/// spaces or line breaks, and `target` starts with `/`. Bytes need not be
/// UTF-8. Only `connection` and `content-length` are interpreted: neither may
/// repeat, and content-length must be `0`.
pub fn parse_request(block: &[u8]) -> Result<Request, ParseError> {
    let head = block
        .strip_suffix(b"\r\n\r\n")
        .ok_or(ParseError::InvalidRequest)?;

    let mut lines = CrlfLines { rest: Some(head) };

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let (method, target, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        let (name, value) = parse_header_line(line)?;

        match name.as_str() {
            "connection" => {
                if headers.contains_key("connection") {
                    return Err(ParseError::DuplicateHeader("connection"));
                }
            }
            "content-length" => {
                if headers.contains_key("content-length") {
                    return Err(ParseError::DuplicateHeader("content-length"));
                }
                if value != b"0" {
                    return Err(ParseError::InvalidContentLength);
                }
            }
            _ => {}
        }

        headers.insert(name, String::from_utf8_lossy(value).into_owned());
    }

    let method = String::from_utf8_lossy(method);

    Ok(Request {
        method: Method::from(&*method),
        target: target.to_vec(),
        version: String::from_utf8_lossy(version).into_owned(),
        headers,
    })
}

/// Splits on `\r\n`, yielding the trailing piece even when empty.
struct CrlfLines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Iterator for CrlfLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        match rest.windows(2).position(|w| w == b"\r\n") {
            Some(i) => {
                self.rest = Some(&rest[i + 2..]);
                Some(&rest[..i])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

fn parse_request_line(line: &[u8]) -> Result<(&[u8], &[u8], &[u8]), ParseError> {
    let mut parts = line.split(|&b| b == b' ');

    let method = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let target = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let version = parts.next().ok_or(ParseError::InvalidRequestLine)?;

    if parts.next().is_some() || !is_token(method) || !is_token(target) {
        return Err(ParseError::InvalidRequestLine);
    }
    if !target.starts_with(b"/") {
        return Err(ParseError::InvalidRequestLine);
    }
    if version != HTTP_VERSION {
        return Err(ParseError::InvalidVersion);
    }

    Ok((method, target, version))
}

/// Returns the lowercased field name and the trimmed raw value.
fn parse_header_line(line: &[u8]) -> Result<(String, &[u8]), ParseError> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(ParseError::InvalidHeader)?;
    let name = &line[..colon];
    let value = trim_spaces(&line[colon + 1..]);

    if !is_token(name) || !is_token(value) {
        return Err(ParseError::InvalidHeader);
    }

    let name = String::from_utf8_lossy(name).to_ascii_lowercase();
    Ok((name, value))
}

fn trim_spaces(mut s: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = s {
        s = rest;
    }
    while let [rest @ .., b' '] = s {
        s = rest;
    }
    s
}

fn is_token(s: &[u8]) -> bool {
    !s.is_empty() && s.iter().all(|&b| !matches!(b, b' ' | b'\r' | b'\n'))
}
