//! Model manifest: versioned JSON statement of one assembly's metadata facts.
//!
//! The manifest is what a binary-metadata walker would emit: every node
//! carries its XML documentation id, relations point at ids, and shapes
//! describe composed type references by id. Example:
//!
//! ```json
//! {
//!   "version": 1,
//!   "assembly": "Acme.Widgets",
//!   "namespaces": [{"id": "N:Acme", "name": "Acme"}],
//!   "types": [
//!     {"id": "T:Acme.Widget", "shape": {"kind": "named", "name": "Widget"},
//!      "namespace": "N:Acme", "base": "T:System.Object"},
//!     {"id": "T:System.Int32[]",
//!      "shape": {"kind": "array", "element": "T:System.Int32"}}
//!   ],
//!   "members": [
//!     {"id": "M:Acme.Widget.Clear", "name": "Clear", "kind": "method",
//!      "declaring_type": "T:Acme.Widget"}
//!   ]
//! }
//! ```
//!
//! Building is fail-fast: a dangling id, a self-referential shape, or a
//! version mismatch aborts with a typed error.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::error::{IoContext, JsonContext, ModelError, ModelResult};
use crate::model::member::MemberKind;
use crate::model::reference::{MemberId, Reference, TypeId};
use crate::model::registry::{DocModel, MemberSpec, RefKey, TypeSpec};
use crate::model::type_ref::{GenericScope, TypeShape};

/// Current version of the manifest format, for compatibility checking.
pub const MODEL_MANIFEST_VERSION: u32 = 1;

/// Top-level manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    pub assembly: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceEntry>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    pub id: String,
    pub shape: ShapeEntry,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub declaring_type: Option<String>,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Wire form of a type reference shape. Composed shapes point at other
/// type entries by id; their display names are derived, not stated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeEntry {
    Named {
        name: String,
    },
    Array {
        element: String,
    },
    Pointer {
        element: String,
    },
    Sentinel {
        element: String,
    },
    Generic {
        definition: String,
        arguments: Vec<String>,
    },
    GenericParam {
        name: String,
        position: usize,
        scope: ScopeEntry,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeEntry {
    Type,
    Method,
}

impl From<ScopeEntry> for GenericScope {
    fn from(scope: ScopeEntry) -> Self {
        match scope {
            ScopeEntry::Type => GenericScope::Type,
            ScopeEntry::Method => GenericScope::Method,
        }
    }
}

impl From<GenericScope> for ScopeEntry {
    fn from(scope: GenericScope) -> Self {
        match scope {
            GenericScope::Type => ScopeEntry::Type,
            GenericScope::Method => ScopeEntry::Method,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEntry {
    pub id: String,
    pub name: String,
    pub kind: KindEntry,
    pub declaring_type: String,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub generic_args: Vec<String>,
    #[serde(default)]
    pub is_extension_definition: bool,
    #[serde(default)]
    pub is_extension_method: bool,
    #[serde(default)]
    pub doc: Option<String>,
    /// Resolver provenance, present only in resolved snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindEntry {
    Method,
    Property,
    Field,
    Event,
}

impl From<KindEntry> for MemberKind {
    fn from(kind: KindEntry) -> Self {
        match kind {
            KindEntry::Method => MemberKind::Method,
            KindEntry::Property => MemberKind::Property,
            KindEntry::Field => MemberKind::Field,
            KindEntry::Event => MemberKind::Event,
        }
    }
}

impl From<MemberKind> for KindEntry {
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Method => KindEntry::Method,
            MemberKind::Property => KindEntry::Property,
            MemberKind::Field => KindEntry::Field,
            MemberKind::Event => KindEntry::Event,
        }
    }
}

pub fn parse_manifest(json: &str) -> ModelResult<ModelManifest> {
    serde_json::from_str(json).with_json_context("Failed to parse model manifest")
}

/// Read a manifest file and build the model it describes.
pub fn load_manifest(path: &Path) -> ModelResult<DocModel> {
    let content = fs::read_to_string(path)
        .with_io_context(&format!("Failed to read manifest '{}'", path.display()))?;
    let manifest = parse_manifest(&content)?;
    build_model(&manifest)
}

/// Populate a fresh model from a manifest.
///
/// Passes: namespaces, then type nodes (shape dependencies resolved
/// recursively in entry order), then base/interface wiring, then members,
/// then snapshot provenance.
pub fn build_model(manifest: &ModelManifest) -> ModelResult<DocModel> {
    if manifest.version != MODEL_MANIFEST_VERSION {
        return Err(ModelError::Version {
            kind: "manifest",
            found: manifest.version,
            expected: MODEL_MANIFEST_VERSION,
        });
    }

    let mut model = DocModel::new(&manifest.assembly);
    for ns in &manifest.namespaces {
        model.add_namespace(&ns.id, &ns.name)?;
    }

    let mut entries: HashMap<&str, &TypeEntry> = HashMap::with_capacity(manifest.types.len());
    for entry in &manifest.types {
        if entries.insert(entry.id.as_str(), entry).is_some() {
            return Err(ModelError::DuplicateId {
                id: entry.id.clone(),
            });
        }
    }
    let mut visiting = HashSet::new();
    for entry in &manifest.types {
        ensure_type(&mut model, &entries, &entry.id, "type list", &mut visiting)?;
    }

    for entry in &manifest.types {
        let ty = lookup_type(&model, &entry.id, "type list")?;
        if let Some(base) = &entry.base {
            let base = lookup_type(&model, base, &format!("base of '{}'", entry.id))?;
            model.set_base(ty, base);
        }
        for interface in &entry.interfaces {
            let interface =
                lookup_type(&model, interface, &format!("interface of '{}'", entry.id))?;
            model.add_interface(ty, interface);
        }
    }

    let mut provenance: Vec<(MemberId, &str)> = Vec::new();
    for entry in &manifest.members {
        let member = add_member(&mut model, entry)?;
        if let Some(source) = &entry.inherited_from {
            provenance.push((member, source));
        }
    }
    for (member, source_id) in provenance {
        let source = match model.lookup(source_id) {
            Some(RefKey::Member(member)) => member,
            _ => {
                return Err(ModelError::UnknownReference {
                    id: source_id.to_string(),
                    context: "inheritance provenance".to_string(),
                });
            }
        };
        model.set_inherited_from(member, source);
    }

    Ok(model)
}

/// Register the type entry with the given id, registering the types its
/// shape points at first. `visiting` catches shapes that reach themselves.
fn ensure_type<'a>(
    model: &mut DocModel,
    entries: &HashMap<&'a str, &'a TypeEntry>,
    id: &'a str,
    context: &str,
    visiting: &mut HashSet<&'a str>,
) -> ModelResult<TypeId> {
    if let Some(existing) = model.type_by_id(id) {
        return Ok(existing);
    }
    let Some(&entry) = entries.get(id) else {
        return Err(ModelError::UnknownReference {
            id: id.to_string(),
            context: context.to_string(),
        });
    };
    if !visiting.insert(id) {
        return Err(ModelError::ShapeCycle { id: id.to_string() });
    }

    let mut spec = match &entry.shape {
        ShapeEntry::Named { name } => TypeSpec::named(&entry.id, name),
        ShapeEntry::Array { element } => {
            let element = ensure_type(
                model,
                entries,
                element,
                &format!("element of '{}'", entry.id),
                visiting,
            )?;
            TypeSpec::array(&entry.id, element)
        }
        ShapeEntry::Pointer { element } => {
            let element = ensure_type(
                model,
                entries,
                element,
                &format!("element of '{}'", entry.id),
                visiting,
            )?;
            TypeSpec::pointer(&entry.id, element)
        }
        ShapeEntry::Sentinel { element } => {
            let element = ensure_type(
                model,
                entries,
                element,
                &format!("element of '{}'", entry.id),
                visiting,
            )?;
            TypeSpec::sentinel(&entry.id, element)
        }
        ShapeEntry::Generic {
            definition,
            arguments,
        } => {
            let definition = ensure_type(
                model,
                entries,
                definition,
                &format!("definition of '{}'", entry.id),
                visiting,
            )?;
            let arguments = arguments
                .iter()
                .map(|argument| {
                    ensure_type(
                        model,
                        entries,
                        argument,
                        &format!("argument of '{}'", entry.id),
                        visiting,
                    )
                })
                .collect::<ModelResult<Vec<_>>>()?;
            TypeSpec::generic(&entry.id, definition, arguments)
        }
        ShapeEntry::GenericParam {
            name,
            position,
            scope,
        } => TypeSpec::generic_param(&entry.id, name, *position, (*scope).into()),
    };

    if let Some(ns) = &entry.namespace {
        let ns = match model.lookup(ns) {
            Some(RefKey::Namespace(ns)) => ns,
            _ => {
                return Err(ModelError::UnknownReference {
                    id: ns.clone(),
                    context: format!("namespace of '{}'", entry.id),
                });
            }
        };
        spec = spec.in_namespace(ns);
    }
    if let Some(declaring) = &entry.declaring_type {
        let declaring = ensure_type(
            model,
            entries,
            declaring,
            &format!("declaring type of '{}'", entry.id),
            visiting,
        )?;
        spec = spec.nested_in(declaring);
    }
    if !entry.generic_params.is_empty() {
        spec = spec.with_generic_params(entry.generic_params.iter().map(String::as_str).collect());
    }
    if let Some(doc) = &entry.doc {
        spec = spec.with_doc(doc.clone());
    }

    visiting.remove(id);
    model.add_type(spec)
}

fn add_member(model: &mut DocModel, entry: &MemberEntry) -> ModelResult<MemberId> {
    let declaring = lookup_type(
        model,
        &entry.declaring_type,
        &format!("declaring type of '{}'", entry.id),
    )?;
    let mut spec = MemberSpec::new(&entry.id, &entry.name, entry.kind.into(), declaring);
    if let Some(element) = &entry.element_type {
        let element = lookup_type(model, element, &format!("element type of '{}'", entry.id))?;
        spec = spec.returning(element);
    }
    for parameter in &entry.parameters {
        let param_type = lookup_type(
            model,
            &parameter.param_type,
            &format!("parameter '{}' of '{}'", parameter.name, entry.id),
        )?;
        spec = spec.with_parameter(&parameter.name, param_type);
    }
    if !entry.generic_params.is_empty() {
        spec = spec.with_generic_params(entry.generic_params.iter().map(String::as_str).collect());
    }
    if !entry.generic_args.is_empty() {
        let args = entry
            .generic_args
            .iter()
            .map(|argument| {
                lookup_type(
                    model,
                    argument,
                    &format!("generic argument of '{}'", entry.id),
                )
            })
            .collect::<ModelResult<Vec<_>>>()?;
        spec = spec.with_generic_args(args);
    }
    if entry.is_extension_definition {
        spec = spec.as_extension_definition();
    }
    if entry.is_extension_method {
        spec = spec.as_extension_method();
    }
    if let Some(doc) = &entry.doc {
        spec = spec.with_doc(doc.clone());
    }
    model.add_member(spec)
}

fn lookup_type(model: &DocModel, id: &str, context: &str) -> ModelResult<TypeId> {
    model
        .type_by_id(id)
        .ok_or_else(|| ModelError::UnknownReference {
            id: id.to_string(),
            context: context.to_string(),
        })
}

/// Dump a model back into manifest form. Used for the resolved snapshot;
/// feeding the result to [`build_model`] reproduces the model.
pub fn export_manifest(model: &DocModel) -> ModelManifest {
    let namespaces = model
        .namespace_ids()
        .into_iter()
        .map(|ns| {
            let node = model.namespace_node(ns);
            NamespaceEntry {
                id: node.id().to_string(),
                name: node.name().to_string(),
            }
        })
        .collect();

    let types = model
        .type_ids()
        .into_iter()
        .map(|ty| {
            let node = model.type_node(ty);
            TypeEntry {
                id: node.id().to_string(),
                shape: export_shape(model, node.shape(), node.name()),
                namespace: node
                    .namespace()
                    .map(|ns| model.namespace_node(ns).id().to_string()),
                declaring_type: node
                    .declaring_type()
                    .map(|declaring| model.type_node(declaring).id().to_string()),
                generic_params: node
                    .generic_params()
                    .iter()
                    .map(|param| param.name.clone())
                    .collect(),
                base: node.base().map(|base| model.type_node(base).id().to_string()),
                interfaces: node
                    .interfaces()
                    .iter()
                    .map(|&interface| model.type_node(interface).id().to_string())
                    .collect(),
                doc: node.doc().map(str::to_string),
            }
        })
        .collect();

    let members = model
        .member_ids()
        .into_iter()
        .map(|member| {
            let node = model.member_node(member);
            MemberEntry {
                id: node.id().to_string(),
                name: node.name().to_string(),
                kind: node.kind().into(),
                declaring_type: model.type_node(node.declaring_type()).id().to_string(),
                element_type: node
                    .element_type()
                    .map(|element| model.type_node(element).id().to_string()),
                parameters: node
                    .parameters()
                    .iter()
                    .map(|parameter| ParameterEntry {
                        name: parameter.name.clone(),
                        param_type: model.type_node(parameter.param_type).id().to_string(),
                    })
                    .collect(),
                generic_params: node
                    .generic_params()
                    .iter()
                    .map(|param| param.name.clone())
                    .collect(),
                generic_args: node
                    .generic_args()
                    .iter()
                    .map(|&argument| model.type_node(argument).id().to_string())
                    .collect(),
                is_extension_definition: node.is_extension_definition(),
                is_extension_method: node.is_extension_method(),
                doc: node.doc().map(str::to_string),
                inherited_from: node
                    .inherited_from()
                    .map(|source| model.member_node(source).id().to_string()),
            }
        })
        .collect();

    ModelManifest {
        version: MODEL_MANIFEST_VERSION,
        assembly: model.assembly().to_string(),
        namespaces,
        types,
        members,
    }
}

fn export_shape(model: &DocModel, shape: &TypeShape, name: &str) -> ShapeEntry {
    match shape {
        TypeShape::Named => ShapeEntry::Named {
            name: name.to_string(),
        },
        TypeShape::Array { element } => ShapeEntry::Array {
            element: model.type_node(*element).id().to_string(),
        },
        TypeShape::Pointer { element } => ShapeEntry::Pointer {
            element: model.type_node(*element).id().to_string(),
        },
        TypeShape::Sentinel { element } => ShapeEntry::Sentinel {
            element: model.type_node(*element).id().to_string(),
        },
        TypeShape::Generic {
            definition,
            arguments,
        } => ShapeEntry::Generic {
            definition: model.type_node(*definition).id().to_string(),
            arguments: arguments
                .iter()
                .map(|&argument| model.type_node(argument).id().to_string())
                .collect(),
        },
        TypeShape::GenericParam { position, scope } => ShapeEntry::GenericParam {
            name: name.to_string(),
            position: *position,
            scope: (*scope).into(),
        },
    }
}
