// tests/mod.rs
//! Test suite organization for anonedits
//!
//! Unit tests live next to the code they cover; this harness holds the
//! integration tests that drive whole pools and pipelines against a
//! scripted wiki or a local HTTP server.

#[cfg(test)]
pub mod integration;
