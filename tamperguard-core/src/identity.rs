//! Identity strings for referenced objects and for the watched target.

use tamperguard_model::{SceneGraph, WatchTarget};
use tamperguard_types::Handle;
use tracing::warn;

use crate::path::structural_path;

/// Separator used inside composite identity strings.
pub const IDENTITY_SEPARATOR: char = '§';

/// Durable identity of the object behind `handle`: `identifier§display-name`.
///
/// Returns `None` when the owning node carries no identity marker or the
/// reference cannot be resolved.
pub fn stable_identity(scene: &dyn SceneGraph, handle: Handle) -> Option<String> {
    let node = scene.owning_node(handle).ok()?;
    let marker = scene.identity_marker(node)?;
    let name = scene.display_name(handle).ok()?;
    Some(format!("{}{IDENTITY_SEPARATOR}{name}", marker.id()))
}

/// Token identifying which object a watcher points at: `path§handle`.
///
/// Handles are process-local, so tokens are only comparable within one
/// session. A target whose path cannot be resolved gets an empty path.
pub fn target_token(scene: &dyn SceneGraph, target: &dyn WatchTarget, max_depth: usize) -> String {
    let handle = target.handle();
    let path = structural_path(scene, handle, max_depth).unwrap_or_else(|e| {
        warn!(target_handle = %handle, error = %e, "Could not resolve path of watched target");
        String::new()
    });
    format!("{path}{IDENTITY_SEPARATOR}{handle}")
}
