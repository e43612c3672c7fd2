use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{EntityHeader, Response};

/// Renders a response as status line, `Connection`, optional
/// `Content-type`/`Location`, `Content-length`, blank line, then body.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let body = resp.body.as_deref().unwrap_or_default();
    let mut buf = Vec::with_capacity(128 + body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    push_header(&mut buf, "Connection", resp.connection());
    match &resp.entity_header {
        Some(EntityHeader::ContentType(v)) => push_header(&mut buf, "Content-type", v),
        Some(EntityHeader::Location(v)) => push_header(&mut buf, "Location", v),
        None => {}
    }
    push_header(&mut buf, "Content-length", &resp.content_length.to_string());

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(body);

    buf
}

fn push_header(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
