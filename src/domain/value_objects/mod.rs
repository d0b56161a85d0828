mod logical_path;

pub use logical_path::LogicalPath;
