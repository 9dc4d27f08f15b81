//! Field values.
//!
//! A [`FieldValue`] is what a watched object reports for one exposed field.
//! Structured values (colors, vectors, rectangles) carry a canonical textual
//! form via `Display`; the fingerprint engine hashes that text, so the format
//! here is part of the persisted fingerprint contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use tamperguard_types::Handle;

use crate::EventBinding;

/// A scalar value hashed by its native representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// An enumerated constant, identified by its ordinal.
    Enum(i64),
}

/// RGBA color with linear components, usually in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x:{}, y:{}, width:{}, height:{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// What a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A scripted behaviour, the same category of object a watcher targets.
    Behaviour,
    /// Any other component attached to a node (renderers, canvases, ...).
    Component,
    /// A node in the scene hierarchy.
    Node,
}

/// A non-null reference to another object in the hosting document.
///
/// The handle may still be dangling: the host reports that as
/// [`ResolveError::Unassigned`](crate::ResolveError::Unassigned) on lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ReferenceKind,
    pub handle: Handle,
}

impl ObjectRef {
    #[must_use]
    pub const fn behaviour(handle: Handle) -> Self {
        Self {
            kind: ReferenceKind::Behaviour,
            handle,
        }
    }

    #[must_use]
    pub const fn component(handle: Handle) -> Self {
        Self {
            kind: ReferenceKind::Component,
            handle,
        }
    }

    #[must_use]
    pub const fn node(handle: Handle) -> Self {
        Self {
            kind: ReferenceKind::Node,
            handle,
        }
    }
}

/// The current value of one exposed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Absent value or null reference.
    Null,
    Primitive(Primitive),
    Text(String),
    Color(Color),
    Vector2(Vector2),
    Vector3(Vector3),
    Rect(Rect),
    Reference(ObjectRef),
    List(Vec<FieldValue>),
    Events(EventBinding),
    /// A value the model has no representation for.
    Unsupported { type_name: String },
}

impl FieldValue {
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Self::Primitive(Primitive::Bool(value))
    }

    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::Primitive(Primitive::Int(value))
    }

    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::Primitive(Primitive::Float(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// A list of integer primitives.
    #[must_use]
    pub fn int_list(values: impl IntoIterator<Item = i64>) -> Self {
        Self::List(values.into_iter().map(Self::int).collect())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Primitive> for FieldValue {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<ObjectRef> for FieldValue {
    fn from(r: ObjectRef) -> Self {
        Self::Reference(r)
    }
}

impl From<EventBinding> for FieldValue {
    fn from(b: EventBinding) -> Self {
        Self::Events(b)
    }
}
