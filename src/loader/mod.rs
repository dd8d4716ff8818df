//! Loaders that populate a `DocModel` from on-disk facts
//!
//! Two inputs feed the model: a versioned JSON manifest stating the raw
//! metadata facts (ids, names, shapes, relations, signatures) and the C#
//! compiler's XML documentation comments file. The manifest loader fails
//! fast on dangling ids and version mismatches; the comments loader counts
//! unknown ids and moves on.

pub mod manifest;
pub mod xml_comments;

pub use manifest::{
    MODEL_MANIFEST_VERSION, ModelManifest, build_model, export_manifest, load_manifest,
    parse_manifest,
};
pub use xml_comments::{AttachStats, XmlCommentsError, attach_comments, attach_comments_file};
