//! Core library for the `gust` CLI.
//!
//! This crate provides the internal building blocks used by the binary: the
//! CLI argument surface, the immutable run configuration, the instrumented
//! HTTP transport, per-client counters, the client worker loop, and the
//! aggregated report. The primary user-facing interface is the `gust`
//! command-line application.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod worker;
