pub mod output;
pub mod real;
pub mod traits;
pub mod walker;
pub mod writers;

pub use output::{create_writer, open_destination, OutputFormat, OutputWriter};
pub use real::RealFileSystem;
pub use traits::FileSystem;
pub use walker::{find_project_name, FileWalker};
