//! The lock state machine.
//!
//! A [`TamperWatcher`] is attached to one target. [`lock`](TamperWatcher::lock)
//! freezes the target's fingerprint map as the baseline; every later check
//! recomputes the map and compares it with the baseline. The first detected
//! difference unlocks the watcher. Nothing re-locks automatically.
//!
//! ```text
//!            lock()
//!   Unlocked ───────▶ Locked
//!      ▲                │
//!      └────────────────┘
//!   drift detected, or target swapped
//! ```
//!
//! Targets that expose a [`ChangeNotifier`](tamperguard_model::ChangeNotifier)
//! are checked as soon as they report an edit. Others are checked on the
//! first [`validate`](TamperWatcher::validate) pass after a restore, or when
//! the host calls [`check_for_change`](TamperWatcher::check_for_change).
//!
//! Notifications arrive synchronously and may re-enter the watcher while it
//! is fingerprinting. Such notifications are dropped. Public calls made from
//! inside a running operation fail with [`WatchError::Reentrant`].

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tamperguard_model::{ChangeListener, SceneGraph, SubscriptionId, WatchTarget};
use tamperguard_types::LockTimestamp;
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::{ComparisonMode, WatcherConfig};
use crate::error::{WatchError, WatchResult};
use crate::fingerprint::{FieldDiagnostic, FingerprintEngine, FingerprintMap};
use crate::host::DirtyMarker;
use crate::identity::target_token;
use crate::state::{FieldReport, PersistedState, compare_fields};

/// Watches one target for edits made after it was locked.
pub struct TamperWatcher {
    inner: Rc<RefCell<WatcherCore>>,
}

struct WatcherCore {
    config: WatcherConfig,
    scene: Rc<dyn SceneGraph>,
    dirty: Rc<dyn DirtyMarker>,
    target: Option<Rc<dyn WatchTarget>>,
    state: PersistedState,
    baseline: Option<FingerprintMap>,
    current: Option<FingerprintMap>,
    diagnostics: Vec<FieldDiagnostic>,
    subscription: Option<(Rc<dyn WatchTarget>, SubscriptionId)>,
    /// False until the first validation pass after a restore.
    loaded: bool,
    pending_dirty: bool,
    self_ref: Weak<RefCell<WatcherCore>>,
}

impl TamperWatcher {
    /// Creates an unlocked watcher with no target.
    pub fn new(
        scene: Rc<dyn SceneGraph>,
        dirty: Rc<dyn DirtyMarker>,
        config: WatcherConfig,
    ) -> Self {
        let state = PersistedState {
            show_debug_panel: config.show_debug_panel,
            ..PersistedState::default()
        };
        Self::build(scene, dirty, config, state, None, None, true)
    }

    /// Recreates a watcher from state saved with the hosting document.
    ///
    /// The restored watcher has no target. Assign one with
    /// [`watch`](Self::watch); the first assignment only records the target's
    /// identity token, because handles from the previous session are
    /// meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Codec`] if either stored map is malformed.
    pub fn restore(
        scene: Rc<dyn SceneGraph>,
        dirty: Rc<dyn DirtyMarker>,
        config: WatcherConfig,
        state: PersistedState,
    ) -> WatchResult<Self> {
        let mut baseline = decode_optional(&state.baseline)?;
        // A locked target with no hashable fields persists an empty baseline.
        if state.locked && baseline.is_none() {
            baseline = Some(FingerprintMap::new());
        }
        let current = decode_optional(&state.current)?;
        debug!(
            locked = state.locked,
            baseline_fields = baseline.as_ref().map_or(0, FingerprintMap::len),
            "Restored watcher state"
        );
        Ok(Self::build(scene, dirty, config, state, baseline, current, false))
    }

    fn build(
        scene: Rc<dyn SceneGraph>,
        dirty: Rc<dyn DirtyMarker>,
        config: WatcherConfig,
        state: PersistedState,
        baseline: Option<FingerprintMap>,
        current: Option<FingerprintMap>,
        loaded: bool,
    ) -> Self {
        let inner = Rc::new_cyclic(|self_ref| {
            RefCell::new(WatcherCore {
                config,
                scene,
                dirty,
                target: None,
                state,
                baseline,
                current,
                diagnostics: Vec::new(),
                subscription: None,
                loaded,
                pending_dirty: false,
                self_ref: self_ref.clone(),
            })
        });
        Self { inner }
    }

    /// Assigns the target and runs a validation pass.
    ///
    /// Returns true if the pass detected drift.
    ///
    /// # Errors
    ///
    /// Fails with [`WatchError::Reentrant`] when called from inside another
    /// watcher operation.
    pub fn watch(&self, target: Rc<dyn WatchTarget>) -> WatchResult<bool> {
        self.run(|core| {
            core.target = Some(target);
            core.validate()
        })?
    }

    /// Drops the target reference. Locked state and maps are kept.
    pub fn clear_target(&self) -> WatchResult<()> {
        self.run(|core| {
            warn!("Watcher target cleared");
            core.unsubscribe();
            core.target = None;
        })
    }

    /// Runs the host's validation hook.
    ///
    /// The first pass after [`restore`](Self::restore) records the target
    /// token, then either subscribes to the target's notifications or, for
    /// targets that cannot push, checks for drift immediately. Later passes
    /// reset the watcher if the target was swapped.
    ///
    /// Returns true if the pass detected drift.
    pub fn validate(&self) -> WatchResult<bool> {
        self.run(WatcherCore::validate)?
    }

    /// Freezes the target's current fingerprint as the baseline.
    ///
    /// # Errors
    ///
    /// Fails with [`WatchError::MissingTarget`] when no target is assigned.
    pub fn lock(&self) -> WatchResult<()> {
        self.run(WatcherCore::lock)?
    }

    /// Recomputes the target's fingerprint and compares it with the baseline.
    ///
    /// Returns true if they differ. Without a target or a baseline there is
    /// nothing to compare and the result is false.
    pub fn check_for_change(&self) -> WatchResult<bool> {
        self.run(WatcherCore::check_for_change)?
    }

    pub fn is_locked(&self) -> WatchResult<bool> {
        self.read(|core| core.state.locked)
    }

    pub fn lock_timestamp(&self) -> WatchResult<Option<LockTimestamp>> {
        self.read(|core| core.state.lock_timestamp)
    }

    /// The map frozen by the last lock or target swap.
    pub fn baseline(&self) -> WatchResult<Option<FingerprintMap>> {
        self.read(|core| core.baseline.clone())
    }

    /// The map from the most recent check. Cleared by lock.
    pub fn current(&self) -> WatchResult<Option<FingerprintMap>> {
        self.read(|core| core.current.clone())
    }

    /// Diagnostics from the most recent fingerprinting pass.
    pub fn diagnostics(&self) -> WatchResult<Vec<FieldDiagnostic>> {
        self.read(|core| core.diagnostics.clone())
    }

    /// Per-field comparison of the baseline with the most recent check.
    pub fn field_report(&self) -> WatchResult<Vec<FieldReport>> {
        self.read(|core| match &core.baseline {
            Some(baseline) => compare_fields(baseline, core.current.as_ref()),
            None => Vec::new(),
        })
    }

    /// State to save with the hosting document.
    pub fn persisted_state(&self) -> WatchResult<PersistedState> {
        self.read(|core| core.state.clone())
    }

    pub fn target_token(&self) -> WatchResult<String> {
        self.read(|core| core.state.target_token.clone())
    }

    pub fn show_debug_panel(&self) -> WatchResult<bool> {
        self.read(|core| core.state.show_debug_panel)
    }

    pub fn set_show_debug_panel(&self, show: bool) -> WatchResult<()> {
        self.run(|core| {
            if core.state.show_debug_panel != show {
                core.state.show_debug_panel = show;
                core.pending_dirty = true;
            }
        })
    }

    /// Whether the watcher is registered for the target's notifications.
    pub fn is_subscribed(&self) -> WatchResult<bool> {
        self.read(|core| core.subscription.is_some())
    }

    /// Runs `op` with exclusive access, then marks the host dirty if `op`
    /// asked for it. The dirty marker is called after the borrow is released.
    fn run<T>(&self, op: impl FnOnce(&mut WatcherCore) -> T) -> WatchResult<T> {
        let (out, dirty) = {
            let mut core = self
                .inner
                .try_borrow_mut()
                .map_err(|_| WatchError::Reentrant)?;
            let out = op(&mut *core);
            (out, core.take_dirty())
        };
        if let Some(dirty) = dirty {
            dirty.mark_dirty();
        }
        Ok(out)
    }

    fn read<T>(&self, op: impl FnOnce(&WatcherCore) -> T) -> WatchResult<T> {
        let core = self.inner.try_borrow().map_err(|_| WatchError::Reentrant)?;
        Ok(op(&*core))
    }
}

impl fmt::Debug for TamperWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(core) => f
                .debug_struct("TamperWatcher")
                .field("locked", &core.state.locked)
                .field("target_token", &core.state.target_token)
                .field("subscribed", &core.subscription.is_some())
                .finish(),
            Err(_) => f.write_str("TamperWatcher { <busy> }"),
        }
    }
}

impl WatcherCore {
    fn validate(&mut self) -> WatchResult<bool> {
        // `loaded` stays unset until a pass has a target to record.
        let Some(target) = self.target.clone() else {
            warn!("Validation pass without a target");
            return Ok(false);
        };
        let token = self.token_of(&*target);

        if !self.loaded {
            self.loaded = true;
            self.state.target_token = token;
            if target.change_notifier().is_some() {
                self.subscribe(&target);
                return Ok(false);
            }
            debug!("Target cannot push notifications; checking on load");
            return self.check_for_change();
        }

        if token == self.state.target_token {
            return Ok(false);
        }
        info!(
            previous = %self.state.target_token,
            token = %token,
            "Watched target swapped; resetting baseline"
        );
        self.state.locked = false;
        self.state.lock_timestamp = None;
        let baseline = self.compute(&*target);
        self.state.baseline = codec::encode(&baseline)?;
        self.baseline = Some(baseline);
        self.current = None;
        self.state.current.clear();
        self.subscribe(&target);
        self.state.target_token = token;
        self.pending_dirty = true;
        Ok(false)
    }

    fn lock(&mut self) -> WatchResult<()> {
        let Some(target) = self.target.clone() else {
            return Err(WatchError::MissingTarget);
        };
        self.current = None;
        self.state.current.clear();
        let baseline = self.compute(&*target);
        self.state.baseline = codec::encode(&baseline)?;
        let fields = baseline.len();
        self.baseline = Some(baseline);
        self.state.locked = true;
        self.state.lock_timestamp = Some(LockTimestamp::now());
        self.state.target_token = self.token_of(&*target);
        self.loaded = true;
        self.subscribe(&target);
        self.pending_dirty = true;
        info!(
            target_type = target.type_name(),
            fields,
            "Locked target"
        );
        Ok(())
    }

    fn check_for_change(&mut self) -> WatchResult<bool> {
        let Some(target) = self.target.clone() else {
            debug!("No target to check");
            return Ok(false);
        };
        let Some(baseline) = self.baseline.clone() else {
            warn!(
                target_type = target.type_name(),
                "No baseline to compare against; lock the target first"
            );
            return Ok(false);
        };

        let current = self.compute(&*target);
        self.state.current = codec::encode(&current)?;
        let changed = match self.config.comparison {
            ComparisonMode::Sum => baseline.sum() != current.sum(),
            ComparisonMode::PerField => baseline != current,
        };
        self.current = Some(current);

        if changed {
            info!(
                target_type = target.type_name(),
                was_locked = self.state.locked,
                "Drift detected; watcher unlocked"
            );
            self.state.locked = false;
            self.state.lock_timestamp = None;
            self.pending_dirty = true;
        }
        Ok(changed)
    }

    fn on_target_changed(&mut self) {
        if let Err(e) = self.check_for_change() {
            warn!(error = %e, "Change notification check failed");
        }
    }

    fn compute(&mut self, target: &dyn WatchTarget) -> FingerprintMap {
        let out = FingerprintEngine::new(&*self.scene, self.config.max_path_depth)
            .fingerprint(target);
        self.diagnostics = out.diagnostics;
        out.map
    }

    fn token_of(&self, target: &dyn WatchTarget) -> String {
        target_token(&*self.scene, target, self.config.max_path_depth)
    }

    fn subscribe(&mut self, target: &Rc<dyn WatchTarget>) {
        self.unsubscribe();
        let Some(notifier) = target.change_notifier() else {
            warn!(
                target_type = target.type_name(),
                "Target cannot push notifications; edits are only seen on explicit checks"
            );
            return;
        };
        let id = notifier.subscribe(change_listener(self.self_ref.clone()));
        self.subscription = Some((Rc::clone(target), id));
    }

    fn unsubscribe(&mut self) {
        if let Some((target, id)) = self.subscription.take() {
            if let Some(notifier) = target.change_notifier() {
                notifier.unsubscribe(id);
            }
        }
    }

    fn take_dirty(&mut self) -> Option<Rc<dyn DirtyMarker>> {
        std::mem::take(&mut self.pending_dirty).then(|| Rc::clone(&self.dirty))
    }
}

impl Drop for WatcherCore {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Listener handed to the target. Holds the watcher weakly so the target
/// never keeps a dropped watcher alive.
fn change_listener(watcher: Weak<RefCell<WatcherCore>>) -> ChangeListener {
    Rc::new(move || {
        let Some(inner) = watcher.upgrade() else {
            return;
        };
        let dirty = match inner.try_borrow_mut() {
            Ok(mut core) => {
                core.on_target_changed();
                core.take_dirty()
            }
            Err(_) => {
                debug!("Change notification arrived mid-operation; dropped");
                return;
            }
        };
        if let Some(dirty) = dirty {
            dirty.mark_dirty();
        }
    })
}

fn decode_optional(s: &str) -> WatchResult<Option<FingerprintMap>> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(codec::decode(s)?))
}
