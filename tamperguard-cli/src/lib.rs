//! Scene documents and the batch operations behind the `tamperguard` binary.
//!
//! A scene document is a JSON file holding a node hierarchy, the components
//! attached to it with their exposed fields, and the persisted state of every
//! watcher. Each command rebuilds the scene in memory, restores the watchers,
//! runs one operation across them and, if any watcher state changed, writes
//! the document back.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tamperguard_core::{FieldReport, PersistedState, TamperWatcher, WatcherConfig};
use tamperguard_model::{
    FieldDescriptor, FieldKind, FieldValue, IdentityMarker, Inspectable, Record, SceneTree,
};
use tamperguard_types::{Handle, LockTimestamp, StableId};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    #[serde(default)]
    pub watchers: Vec<WatcherEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub handle: Handle,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Handle>,
    /// Identifier of the node's identity marker, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<StableId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub handle: Handle,
    pub node: Handle,
    pub type_name: String,
    /// Whether the component pushes change notifications.
    #[serde(default)]
    pub notifying: bool,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "null_value")]
    pub value: FieldValue,
}

fn null_value() -> FieldValue {
    FieldValue::Null
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherEntry {
    /// Handle of the watched component.
    pub target: Handle,
    #[serde(default)]
    pub state: PersistedState,
}

/// Result of running one command against one watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatcherOutcome {
    pub target: Handle,
    pub type_name: String,
    pub locked: bool,
    pub lock_timestamp: Option<LockTimestamp>,
    pub drifted: bool,
    pub fields: Vec<FieldReport>,
    pub diagnostics: Vec<String>,
    pub show_debug_panel: bool,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<WatcherOutcome>,
    /// Whether any watcher asked for the document to be saved.
    pub dirty: bool,
}

impl RunSummary {
    #[must_use]
    pub fn any_drift(&self) -> bool {
        self.outcomes.iter().any(|o| o.drifted)
    }
}

impl SceneDocument {
    /// Reads a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene document {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene document {}", path.display()))
    }

    /// Writes the document as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to encode scene document")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write scene document {}", path.display()))
    }

    /// Builds the in-memory scene and one record per component.
    pub fn build(&self) -> Result<LoadedScene> {
        let scene = Rc::new(SceneTree::new());
        for node in &self.nodes {
            scene.insert_node(node.handle, &node.name, node.parent);
            if let Some(id) = node.stable_id {
                scene.set_marker(node.handle, IdentityMarker::with_id(id))?;
            }
        }

        let mut records = BTreeMap::new();
        for component in &self.components {
            scene.insert_component(component.handle, component.node, &component.type_name);
            let record = if component.notifying {
                Record::notifying(component.handle, &component.type_name)
            } else {
                Record::new(component.handle, &component.type_name)
            };
            for field in &component.fields {
                record.insert_field(
                    FieldDescriptor::new(&field.name, field.kind.clone()),
                    field.value.clone(),
                );
            }
            if records.insert(component.handle, Rc::new(record)).is_some() {
                return Err(anyhow!("Duplicate component handle {}", component.handle));
            }
        }
        debug!(
            nodes = self.nodes.len(),
            components = records.len(),
            "Built scene"
        );
        Ok(LoadedScene { scene, records })
    }

    /// Ensures a watcher entry exists for `target`. Returns true if one was added.
    pub fn add_watcher(&mut self, target: Handle, config: &WatcherConfig) -> bool {
        if self.watchers.iter().any(|w| w.target == target) {
            return false;
        }
        self.watchers.push(WatcherEntry {
            target,
            state: PersistedState {
                show_debug_panel: config.show_debug_panel,
                ..PersistedState::default()
            },
        });
        true
    }
}

/// A document's scene, ready for watchers.
pub struct LoadedScene {
    pub scene: Rc<SceneTree>,
    pub records: BTreeMap<Handle, Rc<Record>>,
}

/// Command to run against the watchers of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Lock every watcher, or only the watcher of one target.
    Lock(Option<Handle>),
    /// Recompute fingerprints and unlock drifted watchers.
    Check,
    /// Report the saved lock state and current drift without saving.
    Status,
}

/// Runs `op` against every watcher in `doc`, updating their persisted state.
pub fn run(doc: &mut SceneDocument, config: &WatcherConfig, op: Operation) -> Result<RunSummary> {
    if let Operation::Lock(Some(target)) = op {
        if doc.add_watcher(target, config) {
            info!(target_handle = %target, "Added watcher");
        }
    }
    let loaded = doc.build()?;
    let dirty = Rc::new(Cell::new(false));
    let mut summary = RunSummary::default();

    for entry in &mut doc.watchers {
        if let Operation::Lock(Some(target)) = op {
            if entry.target != target {
                continue;
            }
        }
        let record = loaded
            .records
            .get(&entry.target)
            .cloned()
            .ok_or_else(|| anyhow!("Watcher target {} is not a component", entry.target))?;

        let flag = Rc::clone(&dirty);
        let watcher = TamperWatcher::restore(
            loaded.scene.clone(),
            Rc::new(move || flag.set(true)),
            config.clone(),
            entry.state.clone(),
        )
        .with_context(|| format!("Failed to restore watcher for {}", entry.target))?;

        let mut drifted = watcher.watch(record.clone())?;
        match op {
            Operation::Lock(_) => {
                watcher.lock()?;
                drifted = false;
                info!(target_handle = %entry.target, "Locked");
            }
            Operation::Check | Operation::Status => {
                drifted |= watcher.check_for_change()?;
                if drifted {
                    warn!(target_handle = %entry.target, "Drift detected");
                }
            }
        }

        let state = watcher.persisted_state()?;
        let fields = watcher.field_report()?;
        // status reports the lock as saved in the document
        let saved = if op == Operation::Status {
            &entry.state
        } else {
            &state
        };
        summary.outcomes.push(WatcherOutcome {
            target: entry.target,
            type_name: record.type_name().to_string(),
            locked: saved.locked,
            lock_timestamp: saved.lock_timestamp,
            drifted,
            fields,
            diagnostics: watcher
                .diagnostics()?
                .iter()
                .map(ToString::to_string)
                .collect(),
            show_debug_panel: state.show_debug_panel,
        });
        if op != Operation::Status {
            entry.state = state;
        }
    }

    summary.dirty = dirty.get() && op != Operation::Status;
    Ok(summary)
}
