//! Loader for C# compiler XML documentation files
//!
//! The compiler emits one file per assembly:
//!
//! ```xml
//! <doc>
//!   <assembly><name>Acme.Widgets</name></assembly>
//!   <members>
//!     <member name="T:Acme.Widget"><summary>...</summary></member>
//!     <member name="M:Acme.Widget.Clear"><inheritdoc/></member>
//!   </members>
//! </doc>
//! ```
//!
//! Each member element's inner XML is attached verbatim to the model node
//! carrying that id. Ids the model does not know are counted and logged;
//! the file may document more (or less) than the manifest declared.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

use crate::model::DocModel;

#[derive(Error, Debug)]
pub enum XmlCommentsError {
    #[error("Failed to read XML comments file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML comments: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Attach outcome for one comments document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachStats {
    /// Fragments attached to a model node
    pub attached: usize,
    /// Fragments whose id the model does not know
    pub unknown: usize,
}

pub fn attach_comments_file(
    model: &mut DocModel,
    path: &Path,
) -> Result<AttachStats, XmlCommentsError> {
    let content = fs::read_to_string(path).map_err(|e| XmlCommentsError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    attach_comments(model, &content)
}

/// Walk every `<member name="...">` element and attach its inner XML to the
/// node with that id.
pub fn attach_comments(
    model: &mut DocModel,
    xml: &str,
) -> Result<AttachStats, XmlCommentsError> {
    let mut reader = Reader::from_str(xml);

    let mut stats = AttachStats::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"member" => {
                let mut id = None;
                for attr in e.attributes() {
                    match attr {
                        Ok(attr) => {
                            if attr.key.as_ref() == b"name" {
                                match std::str::from_utf8(&attr.value) {
                                    Ok(value) => id = Some(value.to_string()),
                                    Err(_) => continue,
                                }
                                break;
                            }
                        }
                        Err(_) => continue,
                    }
                }
                // Inner XML up to the matching close tag, markup included.
                let inner = reader.read_text(e.name())?;
                match id {
                    Some(id) => {
                        if model.attach_doc(&id, inner.trim()) {
                            stats.attached += 1;
                        } else {
                            log::debug!("XML comments name '{}' is not in the model", id);
                            stats.unknown += 1;
                        }
                    }
                    None => log::debug!("member element without a name attribute, skipped"),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stats.unknown > 0 {
        log::info!(
            "Attached {} documentation fragment(s), {} unknown id(s) skipped",
            stats.attached,
            stats.unknown
        );
    }
    Ok(stats)
}
