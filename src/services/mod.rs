pub mod compare;
pub mod fs;
pub mod prompt;
pub mod search;
