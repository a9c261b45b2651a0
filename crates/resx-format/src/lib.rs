//! resx-format: flat key/value `.resx` resource files
//!
//! A `.resx` file is an XML document with a small header block
//! (`<resheader>` entries identifying the format) followed by string
//! resources as `<data name=".."><value>..</value></data>` elements.
//! This crate writes and reads that flat string subset; typed or
//! binary-serialized resources are not supported.

pub mod reader;
pub mod writer;

pub use reader::{parse_entries, read_entries};
pub use writer::ResxWriter;

/// MIME type recorded in the `resmimetype` header
pub const RESX_MIME_TYPE: &str = "text/microsoft-resx";

/// Format version recorded in the `version` header
pub const RESX_VERSION: &str = "2.0";

/// Reader class name recorded in the `reader` header
pub const RESX_READER: &str =
    "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

/// Writer class name recorded in the `writer` header
pub const RESX_WRITER: &str =
    "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";
