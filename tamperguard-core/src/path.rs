//! Structural paths.
//!
//! A structural path names an object by its position in the hierarchy:
//! `World/Hall/Door`. It is recomputed on every call, so renaming or moving
//! any ancestor yields a different path.

use tamperguard_model::{ResolveError, SceneGraph};
use tamperguard_types::Handle;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Resolves the slash-joined path from the root to the node owning `handle`.
///
/// Components resolve to the path of the node they are attached to. Fails if
/// any link is unassigned or the chain has more than `max_depth` ancestors.
pub fn structural_path(
    scene: &dyn SceneGraph,
    handle: Handle,
    max_depth: usize,
) -> Result<String, ResolveError> {
    let node = scene.owning_node(handle)?;
    let mut segments = vec![scene.display_name(node)?];
    let mut current = node;
    while let Some(parent) = scene.parent(current)? {
        if segments.len() > max_depth {
            return Err(ResolveError::TooDeep { handle, max_depth });
        }
        segments.push(scene.display_name(parent)?);
        current = parent;
    }
    segments.reverse();
    Ok(segments.join(&PATH_SEPARATOR.to_string()))
}
