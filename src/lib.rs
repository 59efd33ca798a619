//! rsmcp: Typed MCP Server SDK
//!
//! This crate provides a server-side Rust implementation of the Model
//! Context Protocol (MCP): a JSON-RPC 2.0 dispatcher covering the full MCP
//! method surface (initialization, prompts, tools, resources, logging,
//! completion, cancellation), a content model matching the protocol's wire
//! shapes, a client-facing log bridge, a newline-delimited-JSON stdio
//! transport, and a code generator that emits a statically typed adapter
//! layer from a declarative server definition.
//!
//! A typical server defines its catalog with [`codegen::ServerDefinition`],
//! generates bindings once with [`codegen::generate`], implements the
//! generated handler traits, and serves the wired dispatcher with
//! [`transport::serve_stdio`].

pub mod codegen;
pub mod errors;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod transport;
pub mod types;

// Re-export commonly used items
pub use errors::Error;
pub use logging::{ClientLogger, LogSink};
pub use server::{Handler, RequestContext};
pub use transport::{serve_stdio, StdioTransport};
