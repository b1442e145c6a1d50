//! File system utilities: naming and directory layout.

pub mod naming;
pub mod paths;

pub use naming::sanitize_path_component;
pub use paths::{config_dir, item_dir};
