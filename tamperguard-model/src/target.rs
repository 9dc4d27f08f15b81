use tamperguard_types::Handle;

use crate::{ChangeNotifier, FieldDescriptor, FieldValue};

/// Capability trait for objects whose exposed fields can be enumerated.
///
/// This replaces runtime reflection: each concrete type lists its own fields
/// and hands out their current values.
pub trait Inspectable {
    /// Name of the concrete type, used in diagnostics.
    fn type_name(&self) -> &str;

    /// The exposed fields in declaration order.
    fn field_descriptors(&self) -> Vec<FieldDescriptor>;

    /// Current value of the named field, `None` if no such field exists.
    fn field_value(&self, name: &str) -> Option<FieldValue>;
}

/// An object a watcher can lock.
///
/// Most targets only need the [`Inspectable`] part. Targets that can push
/// edit notifications also return a notifier, which lets the watcher detect
/// drift as it happens instead of on the next validation pass.
pub trait WatchTarget: Inspectable {
    /// Process-local handle of this object in the hosting document.
    fn handle(&self) -> Handle;

    /// Notification channel fired whenever an exposed field is edited.
    fn change_notifier(&self) -> Option<&dyn ChangeNotifier> {
        None
    }
}
