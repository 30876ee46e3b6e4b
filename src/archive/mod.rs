pub mod error;
pub mod frame_ext;
pub mod loader;
pub mod records;
