//! Test support: an in-memory file system with injectable read failures,
//! so partial and failed analyses can be exercised without disk I/O.

pub mod memory_fs;

pub use memory_fs::MemoryFileSystem;
