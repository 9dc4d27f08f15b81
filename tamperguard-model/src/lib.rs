//! Field model for tamperguard.
//!
//! Defines the contract between a hosting document and the change-detection
//! core:
//! - [`FieldValue`]: tagged value of one exposed field (primitives, colors,
//!   vectors, references, lists, event bindings)
//! - [`FieldDescriptor`] / [`FieldKind`]: a field's name and declared kind
//! - [`Inspectable`] / [`WatchTarget`]: capability traits a watched object
//!   implements instead of being reflected over
//! - [`ChangeNotifier`] / [`ChangeChannel`]: optional push notifications
//! - [`SceneGraph`]: name, parent and identity-marker lookups the host answers
//!
//! [`SceneTree`] and [`Record`] are in-memory implementations of the host side,
//! used by tests and the automation CLI.

mod binding;
mod notify;
mod record;
mod scene;
mod schema;
mod target;
mod value;

pub use binding::{CallArguments, EventBinding, ParameterKind, PersistentCall};
pub use notify::{ChangeChannel, ChangeListener, ChangeNotifier, SubscriptionId};
pub use record::Record;
pub use scene::{IdentityMarker, ResolveError, SceneGraph, SceneTree};
pub use schema::{FieldDescriptor, FieldKind};
pub use target::{Inspectable, WatchTarget};
pub use value::{Color, FieldValue, ObjectRef, Primitive, Rect, ReferenceKind, Vector2, Vector3};
