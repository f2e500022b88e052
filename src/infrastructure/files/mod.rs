//! Filesystem infrastructure

mod local;

pub use local::{uri_to_path, LocalFileStore};
