#![forbid(unsafe_code)]
#![doc = "Common types and error codes for the xexstore encrypted storage layer."]

pub mod error;

pub use error::*;
