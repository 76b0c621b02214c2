//! Open Packaging Conventions container handling for .docx files.

pub mod package;
pub(crate) mod template;

pub use package::Package;
