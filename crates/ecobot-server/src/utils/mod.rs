pub mod error;
pub mod limiters;
