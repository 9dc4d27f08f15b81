use std::cell::RefCell;
use tamperguard_types::Handle;

use crate::{ChangeChannel, ChangeNotifier, FieldDescriptor, FieldValue, Inspectable, WatchTarget};

/// A generic watch target backed by an ordered list of fields.
///
/// Edits go through [`set`](Self::set), which mirrors an editor writing a
/// field. A notifying record fires its change channel after every edit, the
/// way a scripted behaviour would from its validation hook.
#[derive(Debug)]
pub struct Record {
    handle: Handle,
    type_name: String,
    fields: RefCell<Vec<(FieldDescriptor, FieldValue)>>,
    changes: Option<ChangeChannel>,
}

impl Record {
    /// Creates a record that does not push change notifications.
    pub fn new(handle: Handle, type_name: &str) -> Self {
        Self {
            handle,
            type_name: type_name.into(),
            fields: RefCell::new(Vec::new()),
            changes: None,
        }
    }

    /// Creates a record that notifies subscribers after every edit.
    pub fn notifying(handle: Handle, type_name: &str) -> Self {
        Self {
            changes: Some(ChangeChannel::new()),
            ..Self::new(handle, type_name)
        }
    }

    /// Adds a field, replacing an existing field of the same name.
    #[must_use]
    pub fn with_field(self, descriptor: FieldDescriptor, value: FieldValue) -> Self {
        self.insert_field(descriptor, value);
        self
    }

    /// Adds a field, replacing an existing field of the same name.
    pub fn insert_field(&self, descriptor: FieldDescriptor, value: FieldValue) {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(d, _)| d.name == descriptor.name) {
            Some(slot) => *slot = (descriptor, value),
            None => fields.push((descriptor, value)),
        }
    }

    /// Removes a field. Returns false if it did not exist.
    pub fn remove_field(&self, name: &str) -> bool {
        let mut fields = self.fields.borrow_mut();
        let before = fields.len();
        fields.retain(|(d, _)| d.name != name);
        fields.len() != before
    }

    /// Writes a field value and notifies subscribers.
    ///
    /// Returns false, without notifying, if no field has that name.
    pub fn set(&self, name: &str, value: FieldValue) -> bool {
        let found = {
            let mut fields = self.fields.borrow_mut();
            match fields.iter_mut().find(|(d, _)| d.name == name) {
                Some((_, slot)) => {
                    *slot = value;
                    true
                }
                None => false,
            }
        };
        if found {
            if let Some(changes) = &self.changes {
                changes.notify();
            }
        }
        found
    }

    /// Current value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.field_value(name)
    }

    /// Number of listeners currently subscribed to this record.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changes.as_ref().map_or(0, ChangeChannel::listener_count)
    }
}

impl Inspectable for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field_descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.borrow().iter().map(|(d, _)| d.clone()).collect()
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .borrow()
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(_, v)| v.clone())
    }
}

impl WatchTarget for Record {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn change_notifier(&self) -> Option<&dyn ChangeNotifier> {
        self.changes.as_ref().map(|c| c as &dyn ChangeNotifier)
    }
}
