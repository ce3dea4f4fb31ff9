pub mod content;
pub mod create;
pub mod listing;
pub mod meta;
pub mod remove;
pub mod transfer;
pub mod tree;
pub mod usage;
pub mod walk;

pub use walk::{WalkEntry, Walker};
