use serde::{Deserialize, Serialize};

use crate::{FieldValue, ReferenceKind};

/// The declared kind of an exposed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Primitive,
    Text,
    Color,
    Vector2,
    Vector3,
    Rect,
    /// Reference to a node in the scene hierarchy.
    EntityReference,
    /// Reference to a component or behaviour attached to a node.
    ComponentReference,
    /// Ordered list of the element kind. Text is never a list.
    List(Box<FieldKind>),
    EventBinding,
    /// Declared, but of a kind the fingerprint engine cannot hash.
    Unsupported,
}

impl FieldKind {
    /// Returns true if a value of this shape may be stored in a field of this kind.
    ///
    /// Null is admitted wherever the host language allows a null: text,
    /// references, lists and event bindings.
    #[must_use]
    pub fn admits(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (
                Self::Text | Self::EntityReference | Self::ComponentReference | Self::List(_)
                | Self::EventBinding,
                FieldValue::Null,
            ) => true,
            (Self::Primitive, FieldValue::Primitive(_))
            | (Self::Text, FieldValue::Text(_))
            | (Self::Color, FieldValue::Color(_))
            | (Self::Vector2, FieldValue::Vector2(_))
            | (Self::Vector3, FieldValue::Vector3(_))
            | (Self::Rect, FieldValue::Rect(_))
            | (Self::EventBinding, FieldValue::Events(_))
            | (Self::Unsupported, FieldValue::Unsupported { .. }) => true,
            (Self::EntityReference, FieldValue::Reference(r)) => r.kind == ReferenceKind::Node,
            (Self::ComponentReference, FieldValue::Reference(r)) => r.kind != ReferenceKind::Node,
            (Self::List(element), FieldValue::List(items)) => {
                items.iter().all(|item| item.is_null() || element.admits(item))
            }
            _ => false,
        }
    }
}

/// Name and declared kind of one exposed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique within the owning target.
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a bool / integer / float / enum field.
    pub fn primitive(name: &str) -> Self {
        Self::new(name, FieldKind::Primitive)
    }

    /// Shorthand for a text field.
    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Shorthand for a color field.
    pub fn color(name: &str) -> Self {
        Self::new(name, FieldKind::Color)
    }

    /// Shorthand for a 2-component vector field.
    pub fn vector2(name: &str) -> Self {
        Self::new(name, FieldKind::Vector2)
    }

    /// Shorthand for a 3-component vector field.
    pub fn vector3(name: &str) -> Self {
        Self::new(name, FieldKind::Vector3)
    }

    /// Shorthand for a rectangle field.
    pub fn rect(name: &str) -> Self {
        Self::new(name, FieldKind::Rect)
    }

    /// Shorthand for a node reference field.
    pub fn entity(name: &str) -> Self {
        Self::new(name, FieldKind::EntityReference)
    }

    /// Shorthand for a component or behaviour reference field.
    pub fn component(name: &str) -> Self {
        Self::new(name, FieldKind::ComponentReference)
    }

    /// Shorthand for a list field with the given element kind.
    pub fn list(name: &str, element: FieldKind) -> Self {
        Self::new(name, FieldKind::List(Box::new(element)))
    }

    /// Shorthand for an event binding field.
    pub fn events(name: &str) -> Self {
        Self::new(name, FieldKind::EventBinding)
    }

    /// Shorthand for a field of a kind the engine cannot hash.
    pub fn unsupported(name: &str) -> Self {
        Self::new(name, FieldKind::Unsupported)
    }
}
