//! Detection service: shared context, worker pool, and gRPC transport.

pub mod client;
pub mod config;
pub mod detector;
pub mod grpc;
pub mod pool;
pub mod proto;

pub use client::DetectorClient;
pub use config::{MessageLimits, ServiceConfig, DEFAULT_ADDR, DEFAULT_WORKERS};
pub use detector::Detector;
pub use grpc::{serve, serve_with_shutdown, status_from_error, SymbolDetectorService};
pub use pool::WorkerPool;
