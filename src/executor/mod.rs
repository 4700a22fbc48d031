//! Report executor communication module.
//!
//! The executor is the external backend that owns field catalogs, runs
//! preview queries and stores report definitions. This crate never executes
//! a query itself; it builds the description of one and hands it over.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Quill engine (Rust + Tokio)                   │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                  ExecutorClient (Async)                   │  │
//! │  │  - Spawns the executor as a child process                 │  │
//! │  │  - NDJSON protocol over stdin/stdout                      │  │
//! │  │  - Request IDs for concurrent request correlation         │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                              │                                   │
//! │               stdin (NDJSON) │ stdout (NDJSON)                  │
//! │                              ▼                                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │             Report Executor (Long-Running Child Process)        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use quill::executor::{ExecutorClient, protocol::*};
//!
//! let client = ExecutorClient::spawn("./report-executor").await?;
//!
//! let fields: FieldsResponse = client.request(
//!     methods::CATALOG_FIELDS,
//!     FieldsParams { data_source_id: 3 },
//! ).await?;
//! ```

mod client;
mod error;
pub mod protocol;

pub use client::ExecutorClient;
pub use error::{ExecutorError, ExecutorResult};
