// src/output/mod.rs
//! Output handling: durable append logs during a harvest, and planned
//! result files after it.
//!
//! Result files follow a plan-then-execute split: [`plan_results`] is pure,
//! and [`deliver`] performs the I/O.

mod append_log;
mod paths;
mod plan;
mod writer;

// Re-export the public interface
pub use append_log::{read_log_lines, AppendLog, LogHandle};
pub use paths::{
    OutputLayout, ADDRESS_LOG_FILE, ARTICLE_LOG_FILE, REFINED_ADDRESSES_FILE, REVISIONS_FILE,
};
pub use plan::{plan_results, render_address_list, Delivery, OutputPlan};
pub use writer::{deliver, OutputReport};
