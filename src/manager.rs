//! Documentation pipeline manager
//!
//! Coordinates the stages that turn loader inputs into a resolved model:
//! build the model from a manifest, attach compiler XML comments and web
//! fragments, run inheritance resolution, and persist the outcome as a
//! versioned snapshot that later runs can reload instead of resolving again.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loader::{
    attach_comments_file, build_model, export_manifest, load_manifest, AttachStats, ModelManifest,
};
use crate::model::naming;
use crate::model::{
    resolve_all, DocModel, ModelError, RefKey, Reference, ResolveStats,
};

/// Snapshot format version. Bump when the persisted shape changes.
pub const MODEL_SNAPSHOT_VERSION: u32 = 1;

/// A resolved model persisted to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub model: ModelManifest,
}

/// Documentation looked up for one symbol, with inheritance provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResult {
    /// The XML documentation content
    pub xml_doc: String,
    /// Reference id of the node the documentation is attached to
    pub source_id: String,
    /// Rendered full name of that node
    pub source_name: String,
    /// If inherited, the reference id the text was copied from
    pub inherited_from_id: Option<String>,
    /// If inherited, the rendered full name it was copied from
    pub inherited_from_name: Option<String>,
    /// Whether the documentation arrived through inheritance resolution
    pub is_inherited: bool,
}

/// Owns one documentation model through the load, supplement, resolve, and
/// persist stages.
#[derive(Debug)]
pub struct ModelManager {
    model: DocModel,
}

impl ModelManager {
    pub fn new(model: DocModel) -> Self {
        Self { model }
    }

    /// Build the model from a manifest file.
    pub fn from_manifest_file(path: &Path) -> Result<Self> {
        let model = load_manifest(path)
            .with_context(|| format!("Failed to load model manifest {}", path.display()))?;
        log::info!(
            "Loaded manifest {}: {} namespace(s), {} type(s), {} member(s)",
            path.display(),
            model.namespace_count(),
            model.type_count(),
            model.member_count()
        );
        Ok(Self { model })
    }

    pub fn model(&self) -> &DocModel {
        &self.model
    }

    /// Attach a compiler XML comments file to the model.
    pub fn attach_xml_comments(&mut self, path: &Path) -> Result<AttachStats> {
        let stats = attach_comments_file(&mut self.model, path)
            .with_context(|| format!("Failed to attach XML comments from {}", path.display()))?;
        log::info!(
            "Attached {} comment(s) from {} ({} unknown id(s))",
            stats.attached,
            path.display(),
            stats.unknown
        );
        Ok(stats)
    }

    /// Append a fetched web fragment to the documentation text of the node
    /// with the given id. Empty fragments and unknown ids are skipped.
    pub fn append_web_fragment(&mut self, id: &str, fragment: &str) -> bool {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return false;
        }
        let existing = match self.model.lookup(id) {
            Some(RefKey::Type(ty)) => self.model.type_node(ty).doc().map(str::to_string),
            Some(RefKey::Member(member)) => {
                self.model.member_node(member).doc().map(str::to_string)
            }
            _ => {
                log::debug!("Web fragment targets unknown id '{}'", id);
                return false;
            }
        };
        let combined = match existing {
            Some(doc) if !doc.trim().is_empty() => format!("{doc}\n{fragment}"),
            _ => fragment.to_string(),
        };
        self.model.attach_doc(id, combined)
    }

    /// Run inheritance resolution to a fixed point.
    pub fn resolve(&mut self) -> ResolveStats {
        let stats = resolve_all(&mut self.model);
        log::info!(
            "Resolved {} inherited member(s) in {} pass(es), {} still undocumented",
            stats.inherited,
            stats.passes,
            stats.undocumented
        );
        stats
    }

    /// Documentation for one symbol, addressed by reference id or by the
    /// rendered full name of a type or member.
    pub fn docs_for_symbol(&self, symbol: &str) -> Result<DocResult> {
        let key = self
            .model
            .lookup(symbol)
            .or_else(|| self.find_by_full_name(symbol))
            .ok_or_else(|| anyhow!("Symbol '{}' not found in the model", symbol))?;

        match key {
            RefKey::Type(ty) => {
                let node = self.model.type_node(ty);
                let xml_doc = documented(node.doc())
                    .ok_or_else(|| anyhow!("Type '{}' has no documentation", symbol))?;
                Ok(DocResult {
                    xml_doc,
                    source_id: node.id().to_string(),
                    source_name: naming::type_full_name(&self.model, ty),
                    inherited_from_id: None,
                    inherited_from_name: None,
                    is_inherited: false,
                })
            }
            RefKey::Member(member) => {
                let node = self.model.member_node(member);
                let xml_doc = documented(node.doc())
                    .ok_or_else(|| anyhow!("Member '{}' has no documentation", symbol))?;
                let inherited_from = node.inherited_from();
                Ok(DocResult {
                    xml_doc,
                    source_id: node.id().to_string(),
                    source_name: naming::member_full_name(&self.model, member),
                    inherited_from_id: inherited_from
                        .map(|m| self.model.member_node(m).id().to_string()),
                    inherited_from_name: inherited_from
                        .map(|m| naming::member_full_name(&self.model, m)),
                    is_inherited: inherited_from.is_some(),
                })
            }
            RefKey::Namespace(_) => {
                Err(anyhow!("Namespace '{}' carries no documentation", symbol))
            }
        }
    }

    /// Write the model out as a versioned snapshot.
    pub fn save_resolved(&self, path: &Path) -> Result<()> {
        let snapshot = ModelSnapshot {
            version: MODEL_SNAPSHOT_VERSION,
            generated_at: Utc::now(),
            model: export_manifest(&self.model),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .context("Failed to serialize the resolved model")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create snapshot directory {}", parent.display())
                })?;
            }
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        log::info!("Saved resolved model to {}", path.display());
        Ok(())
    }

    /// Reload a snapshot written by `save_resolved`, provenance included.
    pub fn load_resolved(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: ModelSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Snapshot {} is not valid JSON", path.display()))?;
        if snapshot.version != MODEL_SNAPSHOT_VERSION {
            return Err(ModelError::Version {
                kind: "snapshot",
                found: snapshot.version,
                expected: MODEL_SNAPSHOT_VERSION,
            }
            .into());
        }
        let model = build_model(&snapshot.model)
            .with_context(|| format!("Snapshot {} failed to rebuild", path.display()))?;
        log::info!(
            "Loaded resolved model generated at {}",
            snapshot.generated_at.to_rfc3339()
        );
        Ok(Self { model })
    }

    fn find_by_full_name(&self, symbol: &str) -> Option<RefKey> {
        for ty in self.model.type_ids() {
            if naming::type_full_name(&self.model, ty) == symbol {
                return Some(RefKey::Type(ty));
            }
        }
        for member in self.model.member_ids() {
            if naming::member_full_name(&self.model, member) == symbol {
                return Some(RefKey::Member(member));
            }
        }
        None
    }
}

fn documented(doc: Option<&str>) -> Option<String> {
    doc.filter(|text| !text.trim().is_empty()).map(str::to_string)
}
