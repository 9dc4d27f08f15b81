//! Field fingerprinting.
//!
//! [`FingerprintEngine`] walks a target's exposed fields and maps each field
//! name to a 32-bit fingerprint. Values are dispatched by shape in a fixed
//! precedence order:
//!
//! 1. null → `0`
//! 2. behaviour reference → stable identity, else `path§name`
//! 3. color → canonical text
//! 4. primitive → native value hash
//! 5. list → element count folded with each element's own hash, in order
//! 6. component reference → `path§name`
//! 7. node reference → stable identity, else path
//! 8. text
//! 9. vectors and rectangles → canonical text
//! 10. event binding → `0` without handlers, else the binding signature
//! 11. anything else → skipped with a diagnostic
//!
//! A field that cannot be resolved never aborts the pass: it is recorded as
//! `0` or skipped, and reported as a [`FieldDiagnostic`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use tamperguard_model::{
    EventBinding, FieldKind, FieldValue, Inspectable, ObjectRef, ReferenceKind, ResolveError,
    SceneGraph,
};
use tracing::{debug, warn};

use crate::codec::is_reserved;
use crate::events::binding_signature;
use crate::hash::{hash_primitive, hash_str};
use crate::identity::{IDENTITY_SEPARATOR, stable_identity};
use crate::path::structural_path;

const LIST_MULTIPLIER: i32 = 31;

/// Field name → fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintMap(BTreeMap<String, i32>);

impl FingerprintMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fingerprint, returning the previous value for that field.
    pub fn insert(&mut self, field: impl Into<String>, fingerprint: i32) -> Option<i32> {
        self.0.insert(field.into(), fingerprint)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<i32> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields and fingerprints, ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all fingerprints, widened so it cannot overflow.
    #[must_use]
    pub fn sum(&self) -> i64 {
        self.0.values().map(|v| i64::from(*v)).sum()
    }
}

impl FromIterator<(String, i32)> for FingerprintMap {
    fn from_iter<I: IntoIterator<Item = (String, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FingerprintMap {
    type Item = (String, i32);
    type IntoIter = btree_map::IntoIter<String, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Why a field was skipped or only partially fingerprinted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    /// Declared or valued as a kind the engine cannot hash. Not in the map.
    Unsupported { type_name: String },
    /// The name contains a serialization separator. Not in the map.
    ReservedName,
    /// A second field with the same name. Not in the map.
    DuplicateName,
    /// The target listed the field but returned no value. Not in the map.
    MissingValue,
    /// The value does not match the declared kind. Still fingerprinted.
    KindMismatch { declared: FieldKind },
    /// A reference could not be resolved. Fingerprinted as `0`.
    Unassigned(ResolveError),
    /// A list element of a kind lists do not hash. Contributes nothing.
    UnsupportedListElement { index: usize },
    /// A handler parameter type without a stored argument. Empty token.
    UnsupportedParameter { method: String, type_name: String },
    /// A node argument that could not be resolved. Empty token.
    UnresolvedArgument { method: String },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { type_name } => write!(f, "unsupported value type {type_name}"),
            Self::ReservedName => write!(f, "name contains a reserved separator"),
            Self::DuplicateName => write!(f, "duplicate field name"),
            Self::MissingValue => write!(f, "no value reported"),
            Self::KindMismatch { declared } => {
                write!(f, "value does not match declared kind {declared:?}")
            }
            Self::Unassigned(e) => write!(f, "{e}"),
            Self::UnsupportedListElement { index } => {
                write!(f, "list element {index} cannot be hashed")
            }
            Self::UnsupportedParameter { method, type_name } => {
                write!(f, "handler {method} takes unsupported parameter {type_name}")
            }
            Self::UnresolvedArgument { method } => {
                write!(f, "handler {method} has an unresolved object argument")
            }
        }
    }
}

/// A non-fatal problem found while fingerprinting one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiagnostic {
    pub field: String,
    pub issue: FieldIssue,
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.issue)
    }
}

/// Output of one fingerprinting pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fingerprinted {
    pub map: FingerprintMap,
    pub diagnostics: Vec<FieldDiagnostic>,
}

/// Computes fingerprint maps against a scene graph.
pub struct FingerprintEngine<'a> {
    scene: &'a dyn SceneGraph,
    max_path_depth: usize,
}

impl<'a> FingerprintEngine<'a> {
    pub fn new(scene: &'a dyn SceneGraph, max_path_depth: usize) -> Self {
        Self {
            scene,
            max_path_depth,
        }
    }

    /// Fingerprints every exposed field of `target`.
    pub fn fingerprint(&self, target: &dyn Inspectable) -> Fingerprinted {
        let mut out = Fingerprinted::default();
        for descriptor in target.field_descriptors() {
            let name = descriptor.name;
            let mut issues = Vec::new();
            let fingerprint = if is_reserved(&name) {
                issues.push(FieldIssue::ReservedName);
                None
            } else if out.map.contains(&name) {
                issues.push(FieldIssue::DuplicateName);
                None
            } else if descriptor.kind == FieldKind::Unsupported {
                issues.push(FieldIssue::Unsupported {
                    type_name: "unsupported".into(),
                });
                None
            } else if let Some(value) = target.field_value(&name) {
                if !descriptor.kind.admits(&value) {
                    issues.push(FieldIssue::KindMismatch {
                        declared: descriptor.kind.clone(),
                    });
                }
                self.fingerprint_value(&value, &mut issues)
            } else {
                issues.push(FieldIssue::MissingValue);
                None
            };

            for issue in issues {
                warn!(
                    field = %name,
                    target_type = target.type_name(),
                    issue = %issue,
                    "Field fingerprint diagnostic"
                );
                out.diagnostics.push(FieldDiagnostic {
                    field: name.clone(),
                    issue,
                });
            }
            if let Some(fingerprint) = fingerprint {
                out.map.insert(name, fingerprint);
            }
        }
        debug!(
            target_type = target.type_name(),
            fields = out.map.len(),
            skipped = out.diagnostics.len(),
            "Fingerprinted target"
        );
        out
    }

    /// Fingerprints a single value. `None` means the value cannot be hashed.
    pub fn fingerprint_value(&self, value: &FieldValue, issues: &mut Vec<FieldIssue>) -> Option<i32> {
        let fingerprint = match value {
            FieldValue::Null => 0,
            FieldValue::Reference(r) if r.kind == ReferenceKind::Behaviour => {
                self.behaviour_reference(r, issues)
            }
            FieldValue::Color(c) => hash_str(&c.to_string()),
            FieldValue::Primitive(p) => hash_primitive(p),
            FieldValue::List(items) => self.list(items, issues),
            FieldValue::Reference(r) if r.kind == ReferenceKind::Component => {
                self.component_reference(r, issues)
            }
            FieldValue::Reference(r) => self.node_reference(r, issues),
            FieldValue::Text(s) => hash_str(s),
            FieldValue::Vector3(v) => hash_str(&v.to_string()),
            FieldValue::Vector2(v) => hash_str(&v.to_string()),
            FieldValue::Rect(r) => hash_str(&r.to_string()),
            FieldValue::Events(binding) => self.events(binding, issues),
            FieldValue::Unsupported { type_name } => {
                issues.push(FieldIssue::Unsupported {
                    type_name: type_name.clone(),
                });
                return None;
            }
        };
        Some(fingerprint)
    }

    fn behaviour_reference(&self, r: &ObjectRef, issues: &mut Vec<FieldIssue>) -> i32 {
        if let Some(identity) = stable_identity(self.scene, r.handle) {
            return hash_str(&identity);
        }
        self.path_and_name(r, issues)
    }

    fn component_reference(&self, r: &ObjectRef, issues: &mut Vec<FieldIssue>) -> i32 {
        self.path_and_name(r, issues)
    }

    fn node_reference(&self, r: &ObjectRef, issues: &mut Vec<FieldIssue>) -> i32 {
        if let Some(identity) = stable_identity(self.scene, r.handle) {
            return hash_str(&identity);
        }
        match structural_path(self.scene, r.handle, self.max_path_depth) {
            Ok(path) => hash_str(&path),
            Err(e) => {
                issues.push(FieldIssue::Unassigned(e));
                0
            }
        }
    }

    fn path_and_name(&self, r: &ObjectRef, issues: &mut Vec<FieldIssue>) -> i32 {
        let resolved = structural_path(self.scene, r.handle, self.max_path_depth)
            .and_then(|path| Ok((path, self.scene.display_name(r.handle)?)));
        match resolved {
            Ok((path, name)) => hash_str(&format!("{path}{IDENTITY_SEPARATOR}{name}")),
            Err(e) => {
                issues.push(FieldIssue::Unassigned(e));
                0
            }
        }
    }

    /// Folds the element count and each element's hash in order, so
    /// reordering the list changes the result.
    fn list(&self, items: &[FieldValue], issues: &mut Vec<FieldIssue>) -> i32 {
        // counts beyond i32::MAX saturate
        let mut acc = i32::try_from(items.len()).unwrap_or(i32::MAX);
        for (index, item) in items.iter().enumerate() {
            let element = match item {
                FieldValue::Null => 0,
                FieldValue::Reference(r) => match self.scene.display_name(r.handle) {
                    Ok(name) => hash_str(&name),
                    // an empty slot in the list
                    Err(_) => 0,
                },
                FieldValue::Primitive(p) => hash_primitive(p),
                _ => {
                    issues.push(FieldIssue::UnsupportedListElement { index });
                    0
                }
            };
            acc = acc.wrapping_mul(LIST_MULTIPLIER).wrapping_add(element);
        }
        acc
    }

    fn events(&self, binding: &EventBinding, issues: &mut Vec<FieldIssue>) -> i32 {
        if binding.is_empty() {
            return 0;
        }
        hash_str(&binding_signature(self.scene, binding, issues))
    }
}
