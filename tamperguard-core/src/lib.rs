//! Change detection for locked field sets.
//!
//! Once a target is locked, any edit to one of its exposed fields is noticed
//! and unlocks the watcher. This is tamper evidence for configuration data,
//! not a cryptographic integrity check: fingerprints are 32-bit hashes and
//! collisions are accepted.
//!
//! # Components
//!
//! - **Identity**: stable `uuid§name` identities from identity markers, and
//!   the `path§handle` token of the watched target
//! - **Path**: slash-joined structural paths through the scene hierarchy
//! - **Fingerprint**: per-field 32-bit hashes, dispatched by value shape
//! - **Codec**: the flat `name;hash§name;hash` string form
//! - **Watcher**: the Unlocked/Locked state machine
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use tamperguard_core::{TamperWatcher, WatcherConfig};
//! use tamperguard_model::{FieldDescriptor, FieldValue, Record, SceneTree};
//!
//! let scene = Rc::new(SceneTree::new());
//! let door = scene.add_node("Door", None);
//! let component = scene.add_component(door, "DoorSettings");
//! let record = Rc::new(
//!     Record::new(component, "DoorSettings")
//!         .with_field(FieldDescriptor::primitive("speed"), FieldValue::int(5)),
//! );
//!
//! let watcher = TamperWatcher::new(scene, Rc::new(|| {}), WatcherConfig::default());
//! watcher.watch(record.clone()).unwrap();
//! watcher.lock().unwrap();
//!
//! record.set("speed", FieldValue::int(6));
//! assert!(watcher.check_for_change().unwrap());
//! assert!(!watcher.is_locked().unwrap());
//! ```

mod codec;
mod config;
mod error;
mod events;
mod fingerprint;
mod hash;
mod host;
mod identity;
mod path;
mod state;
mod watcher;

pub use codec::{FIELD_SEPARATOR, RECORD_SEPARATOR, decode, encode, is_reserved};
pub use config::{ComparisonMode, DEFAULT_MAX_PATH_DEPTH, WatcherConfig};
pub use error::{CodecError, CodecResult, WatchError, WatchResult};
pub use events::{UNRESOLVED_SUBSCRIBER, binding_signature};
pub use fingerprint::{
    FieldDiagnostic, FieldIssue, FingerprintEngine, FingerprintMap, Fingerprinted,
};
pub use hash::{hash_primitive, hash_str};
pub use host::DirtyMarker;
pub use identity::{IDENTITY_SEPARATOR, stable_identity, target_token};
pub use path::{PATH_SEPARATOR, structural_path};
pub use state::{FieldReport, FieldStatus, PersistedState, compare_fields, has_drift};
pub use watcher::TamperWatcher;
