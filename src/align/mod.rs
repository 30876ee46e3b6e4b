pub mod aligner;
pub mod axis;
pub mod error;
