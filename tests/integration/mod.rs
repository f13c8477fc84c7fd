// tests/integration/mod.rs
//! Integration tests for anonedits
//!
//! Integration tests verify that multiple components work together correctly,
//! including the crawl and fetch pools, the append logs, the HTTP client and
//! a full harvest writing its result files.

#[cfg(test)]
mod support;


#[cfg(test)]
mod revision_filtering;

#[cfg(test)]
mod revision_properties;



#[cfg(test)]
mod end_to_end_harvest;
