//! `.resx` reader
//!
//! Event-based parse of the flat string subset written by [`crate::writer`].
//! Only `<data>` entries are returned; `<resheader>` metadata is skipped.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use resx_core::{Error, Result};

/// Read all `<data>` entries from a `.resx` file, in document order
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    let xml = std::fs::read_to_string(path.as_ref())?;
    parse_entries(&xml)
}

/// Parse all `<data>` entries from a `.resx` document
pub fn parse_entries(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut entries = Vec::new();
    let mut current_name: Option<String> = None;
    let mut in_data = false;
    let mut in_value = false;
    let mut current_value = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name();
                let tag = std::str::from_utf8(name_bytes.as_ref()).unwrap_or("");

                match tag {
                    "data" => {
                        in_data = true;
                        current_value.clear();
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"name" {
                                current_name =
                                    Some(String::from_utf8_lossy(&attr.value).to_string());
                            }
                        }
                    }
                    "value" if in_data => {
                        in_value = true;
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_value => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::resource(e.to_string()))?;
                current_value.push_str(&text);
            }
            Ok(Event::End(ref e)) => {
                let name_bytes = e.name();
                let tag = std::str::from_utf8(name_bytes.as_ref()).unwrap_or("");

                match tag {
                    "value" => in_value = false,
                    "data" => {
                        if let Some(name) = current_name.take() {
                            entries.push((name, std::mem::take(&mut current_value)));
                        }
                        in_data = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::resource(format!("Malformed .resx: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}
