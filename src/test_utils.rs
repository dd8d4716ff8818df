//! Test utilities shared across the codebase

use std::fs;
use std::path::{Path, PathBuf};

/// Write a named fixture file into a test directory and hand back its path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// A small manifest with a base type, a derived type, and a `Run` method on
/// each, matching [`sample_comments_xml`].
pub fn sample_manifest_json() -> &'static str {
    r#"{
        "version": 1,
        "assembly": "Acme.Widgets",
        "namespaces": [
            { "id": "N:Acme", "name": "Acme" }
        ],
        "types": [
            {
                "id": "T:Acme.Base",
                "shape": { "kind": "named", "name": "Base" },
                "namespace": "N:Acme"
            },
            {
                "id": "T:Acme.Widget",
                "shape": { "kind": "named", "name": "Widget" },
                "namespace": "N:Acme",
                "base": "T:Acme.Base"
            }
        ],
        "members": [
            {
                "id": "M:Acme.Base.Run",
                "name": "Run",
                "kind": "method",
                "declaring_type": "T:Acme.Base"
            },
            {
                "id": "M:Acme.Widget.Run",
                "name": "Run",
                "kind": "method",
                "declaring_type": "T:Acme.Widget"
            }
        ]
    }"#
}

/// Compiler XML comments for [`sample_manifest_json`]: the base method is
/// documented, the derived one inherits.
pub fn sample_comments_xml() -> &'static str {
    r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>Acme.Widgets</name>
    </assembly>
    <members>
        <member name="M:Acme.Base.Run">
            <summary>Runs the widget.</summary>
        </member>
        <member name="M:Acme.Widget.Run">
            <inheritdoc/>
        </member>
    </members>
</doc>
"#
}
