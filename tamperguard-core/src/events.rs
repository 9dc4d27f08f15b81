//! Event binding signatures.
//!
//! An event binding is fingerprinted through a flat signature string built
//! from its configured calls: subscriber name, method name and, for methods
//! taking a parameter, the argument the editor stored for it.

use tamperguard_model::{EventBinding, ParameterKind, PersistentCall, SceneGraph};

use crate::fingerprint::FieldIssue;
use crate::identity::IDENTITY_SEPARATOR;

/// Token standing in for a call whose subscriber is not set.
pub const UNRESOLVED_SUBSCRIBER: &str = "unresolved";

/// Builds the signature of an event binding.
///
/// A call with an unset or unassigned subscriber contributes only
/// [`UNRESOLVED_SUBSCRIBER`]. Arguments that cannot be rendered contribute an
/// empty token and are reported through `issues`.
pub fn binding_signature(
    scene: &dyn SceneGraph,
    binding: &EventBinding,
    issues: &mut Vec<FieldIssue>,
) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(binding.len() * 3);
    for call in &binding.calls {
        let subscriber = call.target.and_then(|t| scene.display_name(t).ok());
        let Some(subscriber) = subscriber else {
            tokens.push(UNRESOLVED_SUBSCRIBER.to_string());
            continue;
        };
        tokens.push(subscriber);
        tokens.push(call.method.clone());
        if let Some(parameter) = &call.parameter {
            tokens.push(argument_token(scene, call, parameter, issues));
        }
    }
    tokens.join(&IDENTITY_SEPARATOR.to_string())
}

fn argument_token(
    scene: &dyn SceneGraph,
    call: &PersistentCall,
    parameter: &ParameterKind,
    issues: &mut Vec<FieldIssue>,
) -> String {
    let args = &call.arguments;
    match parameter {
        ParameterKind::Bool => args.bool_arg.to_string(),
        ParameterKind::Text => args.string_arg.clone(),
        ParameterKind::Int => args.int_arg.to_string(),
        ParameterKind::Float => args.float_arg.to_string(),
        ParameterKind::Entity => match args.object_arg.map(|node| scene.display_name(node)) {
            Some(Ok(name)) => name,
            _ => {
                issues.push(FieldIssue::UnresolvedArgument {
                    method: call.method.clone(),
                });
                String::new()
            }
        },
        ParameterKind::Other(type_name) => {
            issues.push(FieldIssue::UnsupportedParameter {
                method: call.method.clone(),
                type_name: type_name.clone(),
            });
            String::new()
        }
    }
}
