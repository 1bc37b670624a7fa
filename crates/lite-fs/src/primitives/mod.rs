pub mod atomic_write;
pub mod remove;

pub use atomic_write::{AtomicWriteOptions, atomic_write, staging_path};
pub use remove::{remove_dir_all_if_exists, remove_file_if_exists};
