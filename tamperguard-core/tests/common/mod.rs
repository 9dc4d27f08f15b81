//! Shared fixtures for core tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tamperguard_core::{DirtyMarker, PersistedState, TamperWatcher, WatchResult, WatcherConfig};
use tamperguard_model::{
    ChangeChannel, ChangeNotifier, FieldDescriptor, FieldValue, Inspectable, Record, SceneTree,
    WatchTarget,
};
use tamperguard_types::Handle;

/// Counts mark-dirty calls.
#[derive(Debug, Default)]
pub struct DirtyCounter(Cell<usize>);

impl DirtyCounter {
    pub fn count(&self) -> usize {
        self.0.get()
    }
}

impl DirtyMarker for DirtyCounter {
    fn mark_dirty(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// `World/Hall/Door` with a `DoorSettings` component on `Door`.
pub struct Fixture {
    pub scene: Rc<SceneTree>,
    pub dirty: Rc<DirtyCounter>,
    pub world: Handle,
    pub hall: Handle,
    pub door: Handle,
    pub component: Handle,
}

impl Fixture {
    pub fn new() -> Self {
        let scene = Rc::new(SceneTree::new());
        let world = scene.add_node("World", None);
        let hall = scene.add_node("Hall", Some(world));
        let door = scene.add_node("Door", Some(hall));
        let component = scene.add_component(door, "DoorSettings");
        Self {
            scene,
            dirty: Rc::new(DirtyCounter::default()),
            world,
            hall,
            door,
            component,
        }
    }

    /// A plain record on the door component with `speed = 5` and a label.
    pub fn record(&self) -> Rc<Record> {
        Rc::new(door_fields(Record::new(self.component, "DoorSettings")))
    }

    /// Same fields as [`record`](Self::record), but pushes change notifications.
    pub fn notifying_record(&self) -> Rc<Record> {
        Rc::new(door_fields(Record::notifying(self.component, "DoorSettings")))
    }

    pub fn watcher(&self) -> TamperWatcher {
        self.watcher_with(WatcherConfig::default())
    }

    pub fn watcher_with(&self, config: WatcherConfig) -> TamperWatcher {
        TamperWatcher::new(self.scene.clone(), self.dirty.clone(), config)
    }

    pub fn restore(&self, state: PersistedState) -> WatchResult<TamperWatcher> {
        TamperWatcher::restore(
            self.scene.clone(),
            self.dirty.clone(),
            WatcherConfig::default(),
            state,
        )
    }
}

/// Adds `speed = 5` and `label = "front door"`.
pub fn door_fields(record: Record) -> Record {
    record
        .with_field(FieldDescriptor::primitive("speed"), FieldValue::int(5))
        .with_field(FieldDescriptor::text("label"), FieldValue::text("front door"))
}

/// A target that fires its own change channel every time a field is read.
pub struct ChattyTarget {
    pub handle: Handle,
    pub value: RefCell<i64>,
    pub channel: ChangeChannel,
    pub notifications: Cell<usize>,
}

impl ChattyTarget {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            value: RefCell::new(1),
            channel: ChangeChannel::new(),
            notifications: Cell::new(0),
        }
    }
}

impl Inspectable for ChattyTarget {
    fn type_name(&self) -> &str {
        "ChattyTarget"
    }

    fn field_descriptors(&self) -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::primitive("value")]
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        let delivered = self.channel.notify();
        self.notifications.set(self.notifications.get() + delivered);
        (name == "value").then(|| FieldValue::int(*self.value.borrow()))
    }
}

impl WatchTarget for ChattyTarget {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn change_notifier(&self) -> Option<&dyn ChangeNotifier> {
        Some(&self.channel)
    }
}
