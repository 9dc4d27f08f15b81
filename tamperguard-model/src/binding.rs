//! Event bindings.
//!
//! An event binding field holds the persistent handler calls configured in the
//! editor: which object is called, which method, and the single argument the
//! editor lets you attach. Only this configured representation is visible to
//! the fingerprint engine; two calls with the same target, method and argument
//! are indistinguishable even if the handlers behave differently at runtime.

use serde::{Deserialize, Serialize};
use tamperguard_types::Handle;

/// Declared type of a handler method's single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Bool,
    Text,
    Int,
    Float,
    /// A node reference, rendered by its display name.
    Entity,
    /// Any other parameter type, carried by name for diagnostics.
    Other(String),
}

/// Argument slots stored with a persistent call.
///
/// All slots exist on every call; the method's parameter kind decides which
/// one is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallArguments {
    pub bool_arg: bool,
    pub string_arg: String,
    pub int_arg: i64,
    pub float_arg: f64,
    pub object_arg: Option<Handle>,
}

/// One configured handler call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentCall {
    /// Subscriber object. `None` while the editor slot is still empty.
    pub target: Option<Handle>,
    pub method: String,
    /// Parameter of the bound method, `None` for parameterless methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<ParameterKind>,
    #[serde(default)]
    pub arguments: CallArguments,
}

impl PersistentCall {
    /// Creates a call to a parameterless method.
    #[must_use]
    pub fn new(target: Option<Handle>, method: impl Into<String>) -> Self {
        Self {
            target,
            method: method.into(),
            parameter: None,
            arguments: CallArguments::default(),
        }
    }

    /// Binds a bool argument.
    #[must_use]
    pub fn with_bool(mut self, value: bool) -> Self {
        self.parameter = Some(ParameterKind::Bool);
        self.arguments.bool_arg = value;
        self
    }

    /// Binds a text argument.
    #[must_use]
    pub fn with_text(mut self, value: impl Into<String>) -> Self {
        self.parameter = Some(ParameterKind::Text);
        self.arguments.string_arg = value.into();
        self
    }

    /// Binds an integer argument.
    #[must_use]
    pub fn with_int(mut self, value: i64) -> Self {
        self.parameter = Some(ParameterKind::Int);
        self.arguments.int_arg = value;
        self
    }

    /// Binds a float argument.
    #[must_use]
    pub fn with_float(mut self, value: f64) -> Self {
        self.parameter = Some(ParameterKind::Float);
        self.arguments.float_arg = value;
        self
    }

    /// Binds a node argument.
    #[must_use]
    pub fn with_entity(mut self, node: Option<Handle>) -> Self {
        self.parameter = Some(ParameterKind::Entity);
        self.arguments.object_arg = node;
        self
    }

    /// Declares a parameter type the editor cannot serialize an argument for.
    #[must_use]
    pub fn with_other_parameter(mut self, type_name: impl Into<String>) -> Self {
        self.parameter = Some(ParameterKind::Other(type_name.into()));
        self
    }
}

/// The handler calls configured on an event field, in invocation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBinding {
    #[serde(default)]
    pub calls: Vec<PersistentCall>,
}

impl EventBinding {
    /// Creates a binding with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler call.
    #[must_use]
    pub fn with_call(mut self, call: PersistentCall) -> Self {
        self.calls.push(call);
        self
    }

    /// Number of configured handler calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
