pub mod error;
pub mod writer;
