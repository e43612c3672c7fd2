use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::http::framer::{FrameError, RequestFramer};
use crate::http::parser::parse_request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::resolve::{Outcome, Resolver};

const READ_BUFFER_SIZE: usize = 1024;

pub struct Connection<S> {
    stream: S,
    framer: RequestFramer,
    resolver: Arc<Resolver>,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    AwaitingData,
    Framing,
    Dispatching(Bytes),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Arc<Resolver>, max_request_size: usize) -> Self {
        Self {
            stream,
            framer: RequestFramer::new(max_request_size),
            resolver,
            state: ConnectionState::AwaitingData,
        }
    }

    /// Serves requests until the client disconnects or a response closes the
    /// connection. Read and write failures are returned and end the
    /// connection without a response.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitingData => {
                    let mut temp = [0u8; READ_BUFFER_SIZE];
                    let n = self.stream.read(&mut temp).await?;

                    if n == 0 {
                        tracing::debug!("Client closed connection");
                        ConnectionState::Closed
                    } else {
                        self.framer.push(&temp[..n]);
                        ConnectionState::Framing
                    }
                }

                ConnectionState::Framing => match self.framer.next_request() {
                    Ok(Some(block)) => ConnectionState::Dispatching(block),
                    Ok(None) => ConnectionState::AwaitingData,
                    Err(FrameError::TooLarge { limit }) => {
                        tracing::warn!(limit, "Request head too large");
                        let response = Response::from_outcome(Outcome::MalformedRequest, false, true);
                        self.write(&response).await?;
                        ConnectionState::Closed
                    }
                },

                ConnectionState::Dispatching(block) => {
                    let response = handle_request(&block, &self.resolver).await;
                    self.write(&response).await?;

                    // Pipelined requests still buffered are dropped on close.
                    if response.close {
                        ConnectionState::Closed
                    } else {
                        ConnectionState::Framing
                    }
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn write(&mut self, response: &Response) -> anyhow::Result<()> {
        ResponseWriter::new(response)
            .write_to_stream(&mut self.stream)
            .await
    }
}

/// Produces the response for one complete request block.
pub async fn handle_request(block: &[u8], resolver: &Resolver) -> Response {
    let request = match parse_request(block) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = ?e, "Malformed request");
            return Response::from_outcome(Outcome::MalformedRequest, false, true);
        }
    };

    let outcome = if request.method.is_supported() {
        resolver.resolve(&request.target).await
    } else {
        Outcome::NotImplemented
    };
    let response = Response::from_outcome(outcome, request.is_head(), request.wants_close());

    tracing::debug!(
        method = request.method.as_str(),
        path = %request.target_lossy(),
        status = response.status.as_u16(),
        close = response.close,
        "Request handled"
    );

    response
}
