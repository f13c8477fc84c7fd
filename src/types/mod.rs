//! Domain newtypes with validation at construction.

use thiserror::Error;

mod addresses;
mod titles;
mod window;

pub use addresses::*;
pub use titles::*;
pub use window::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid page title: {title} - {reason}")]
    InvalidTitle { title: String, reason: String },

    #[error("Not a category: {0}")]
    NotACategory(String),

    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("Invalid timestamp: {input} - {reason}")]
    InvalidTimestamp { input: String, reason: String },

    #[error("Inverted time window: newest bound {newest} is older than oldest bound {oldest}")]
    InvertedWindow { newest: String, oldest: String },

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: i64, min: i64, max: i64 },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}
