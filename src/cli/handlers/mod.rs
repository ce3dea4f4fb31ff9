//! One function per verb. Each takes the parsed args and reports to `Context::out`.

pub mod files;
pub mod inspect;
pub mod query;
