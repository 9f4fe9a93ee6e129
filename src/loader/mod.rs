//! Host-side loading and symbol lookup, the native half of `NativeLibrary`.

pub mod library;
pub mod path;
pub mod source;

pub use library::NativeLibrary;
pub use path::resolve_library_path;
pub use source::ExportSource;
