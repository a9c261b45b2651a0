//! `.resx` writer
//!
//! Collects named string resources in insertion order and serializes
//! them as a well-formed `.resx` document. Write failures propagate to
//! the caller; there is no partial-write recovery.

use std::collections::HashSet;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use resx_core::{Error, Result};
use tracing::debug;

use crate::{RESX_MIME_TYPE, RESX_READER, RESX_VERSION, RESX_WRITER};

/// Writer for flat string `.resx` resource files
pub struct ResxWriter {
    entries: Vec<(String, String)>,
    names: HashSet<String>,
}

impl ResxWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Add a named string resource.
    ///
    /// Entry names are unique within a file; adding a duplicate name is
    /// rejected, matching the single-key semantics of the format.
    pub fn add_resource(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(Error::invalid_argument(format!(
                "Duplicate resource name: {}",
                name
            )));
        }
        self.entries.push((name, value.into()));
        Ok(())
    }

    /// Number of resources added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no resources have been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize all entries to a `.resx` XML string
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| Error::resource(e.to_string()))?;
        writer
            .write_event(Event::Start(BytesStart::new("root")))
            .map_err(|e| Error::resource(e.to_string()))?;

        for (name, value) in [
            ("resmimetype", RESX_MIME_TYPE),
            ("version", RESX_VERSION),
            ("reader", RESX_READER),
            ("writer", RESX_WRITER),
        ] {
            write_element(&mut writer, "resheader", name, false, value)?;
        }

        for (name, value) in &self.entries {
            write_element(&mut writer, "data", name, true, value)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("root")))
            .map_err(|e| Error::resource(e.to_string()))?;

        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(|e| Error::resource(e.to_string()))
    }

    /// Serialize and write to `path`, overwriting any existing file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml()?;
        std::fs::write(path, xml)?;
        debug!(path = %path.display(), entries = self.entries.len(), "Wrote resource file");
        Ok(())
    }
}

impl Default for ResxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write one `<resheader>` or `<data>` element with a nested `<value>`
fn write_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    name: &str,
    preserve_space: bool,
    value: &str,
) -> Result<()> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("name", name));
    if preserve_space {
        start.push_attribute(("xml:space", "preserve"));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::resource(e.to_string()))?;
    writer
        .write_event(Event::Start(BytesStart::new("value")))
        .map_err(|e| Error::resource(e.to_string()))?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(|e| Error::resource(e.to_string()))?;
    writer
        .write_event(Event::End(BytesEnd::new("value")))
        .map_err(|e| Error::resource(e.to_string()))?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| Error::resource(e.to_string()))?;

    Ok(())
}
