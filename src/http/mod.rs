//! HTTP protocol implementation.
//!
//! A small HTTP/1.1 subset: GET and HEAD only, no request bodies, keep-alive
//! and pipelining over a single connection.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection state machine and request dispatch
//! - **`framer`**: splits the byte stream into complete request heads
//! - **`parser`**: validates a request head and extracts its fields
//! - **`request`**: parsed request representation
//! - **`response`**: response descriptor and builder
//! - **`writer`**: serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────┐
//!        │ AwaitingData │ ← Read from the socket (0 bytes → Closed)
//!        └──────┬───────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────┐
//!        │   Framing    │ ← Look for the next complete request
//!        └──────┬───────┘   (none yet → AwaitingData)
//!               │ Request complete
//!               ▼
//!        ┌──────────────┐
//!        │ Dispatching  │ ← Parse, resolve, write the response
//!        └──────┬───────┘
//!               ├─ Keep-Alive → Framing (next pipelined request)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod framer;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
