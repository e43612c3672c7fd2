//! Portico - minimal HTTP/1.1 origin server
//!
//! Serves files from a directory, falls back to a redirect table, and keeps
//! connections alive across pipelined requests.

pub mod config;
pub mod http;
pub mod resolve;
pub mod server;
