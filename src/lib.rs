//! dotdoc
//!
//! Core of a .NET documentation generator: an arena-backed model of
//! namespaces, type references, and members keyed by opaque id strings, an
//! `inheritdoc` resolver that copies documentation down inheritance chains,
//! loaders for model manifests and compiler XML comments files, a web
//! documentation source, and a pipeline manager that persists the resolved
//! model as a versioned snapshot.

pub mod loader;
pub mod logging;
pub mod manager;
pub mod model;
pub mod webdoc;

#[cfg(test)]
pub mod test_utils;
