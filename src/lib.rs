pub mod cli;
pub mod core;
pub mod models;
pub mod services;

pub use crate::core::errors::{Error, Result};
