mod common;

use common::Fixture;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tamperguard_core::{
    DEFAULT_MAX_PATH_DEPTH, FieldIssue, FingerprintEngine, Fingerprinted, hash_primitive,
    hash_str,
};
use tamperguard_model::{
    Color, EventBinding, FieldDescriptor, FieldKind, FieldValue, Inspectable, ObjectRef,
    PersistentCall, Primitive, Record, ResolveError, SceneTree, Vector3,
};
use tamperguard_types::Handle;

fn fingerprint(scene: &SceneTree, target: &dyn Inspectable) -> Fingerprinted {
    FingerprintEngine::new(scene, DEFAULT_MAX_PATH_DEPTH).fingerprint(target)
}

fn single(scene: &SceneTree, descriptor: FieldDescriptor, value: FieldValue) -> Fingerprinted {
    let record = Record::new(Handle::new(500), "Probe").with_field(descriptor, value);
    fingerprint(scene, &record)
}

fn expected_list(elements: &[i32]) -> i32 {
    elements
        .iter()
        .fold(elements.len() as i32, |acc, h| acc.wrapping_mul(31).wrapping_add(*h))
}

/// Target whose descriptors and values are given verbatim, including
/// duplicates and missing values a [`Record`] cannot express.
struct FixedTarget(Vec<(FieldDescriptor, Option<FieldValue>)>);

impl Inspectable for FixedTarget {
    fn type_name(&self) -> &str {
        "FixedTarget"
    }

    fn field_descriptors(&self) -> Vec<FieldDescriptor> {
        self.0.iter().map(|(d, _)| d.clone()).collect()
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        self.0
            .iter()
            .find(|(d, _)| d.name == name)
            .and_then(|(_, v)| v.clone())
    }
}

// ── scalar values ────────────────────────────────────────────────

#[test]
fn every_supported_field_is_mapped() {
    let f = Fixture::new();
    let out = fingerprint(&f.scene, &*f.record());
    assert_eq!(out.map.len(), 2);
    assert_eq!(out.map.get("speed"), Some(hash_primitive(&Primitive::Int(5))));
    assert_eq!(out.map.get("label"), Some(hash_str("front door")));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn null_is_zero() {
    let scene = SceneTree::new();
    let out = single(&scene, FieldDescriptor::text("note"), FieldValue::Null);
    assert_eq!(out.map.get("note"), Some(0));
}

#[test]
fn primitive_change_is_visible() {
    let f = Fixture::new();
    let record = f.record();
    let before = fingerprint(&f.scene, &*record).map;
    record.set("speed", FieldValue::int(6));
    let after = fingerprint(&f.scene, &*record).map;
    assert_ne!(before.get("speed"), after.get("speed"));
    assert_ne!(before.sum(), after.sum());
}

#[test]
fn structured_values_hash_their_text() {
    let scene = SceneTree::new();
    let red = Color::rgba(1.0, 0.0, 0.0, 1.0);
    let out = single(&scene, FieldDescriptor::color("tint"), FieldValue::Color(red));
    assert_eq!(out.map.get("tint"), Some(hash_str("RGBA(1, 0, 0, 1)")));

    let v = Vector3::new(1.5, 0.0, -2.0);
    let out = single(&scene, FieldDescriptor::vector3("offset"), FieldValue::Vector3(v));
    assert_eq!(out.map.get("offset"), Some(hash_str(&v.to_string())));
}

#[test]
fn enum_and_int_with_same_ordinal_differ() {
    let scene = SceneTree::new();
    let as_enum = single(
        &scene,
        FieldDescriptor::primitive("mode"),
        FieldValue::Primitive(Primitive::Enum(2)),
    );
    let as_int = single(&scene, FieldDescriptor::primitive("mode"), FieldValue::int(2));
    assert_ne!(as_enum.map.get("mode"), as_int.map.get("mode"));
}

// ── lists ────────────────────────────────────────────────────────

#[test]
fn list_folds_count_and_element_hashes() {
    let scene = SceneTree::new();
    let out = single(
        &scene,
        FieldDescriptor::list("steps", FieldKind::Primitive),
        FieldValue::int_list([3, 7, 2]),
    );
    let hashes: Vec<i32> = [3, 7, 2]
        .iter()
        .map(|v| hash_primitive(&Primitive::Int(*v)))
        .collect();
    assert_eq!(out.map.get("steps"), Some(expected_list(&hashes)));
}

#[test]
fn list_is_order_sensitive_and_stable() {
    let scene = SceneTree::new();
    let record = Record::new(Handle::new(1), "Probe").with_field(
        FieldDescriptor::list("steps", FieldKind::Primitive),
        FieldValue::int_list([3, 7, 2]),
    );
    let first = fingerprint(&scene, &record).map.get("steps");
    let second = fingerprint(&scene, &record).map.get("steps");
    assert_eq!(first, second);

    record.set("steps", FieldValue::int_list([2, 7, 3]));
    assert_ne!(fingerprint(&scene, &record).map.get("steps"), first);

    record.set("steps", FieldValue::int_list([3, 7, 4]));
    assert_ne!(fingerprint(&scene, &record).map.get("steps"), first);
}

#[test]
fn empty_list_is_zero() {
    let scene = SceneTree::new();
    let out = single(
        &scene,
        FieldDescriptor::list("steps", FieldKind::Primitive),
        FieldValue::List(Vec::new()),
    );
    assert_eq!(out.map.get("steps"), Some(0));
}

#[test]
fn list_references_hash_display_names() {
    let f = Fixture::new();
    let gone = Handle::new(404);
    let out = single(
        &f.scene,
        FieldDescriptor::list("targets", FieldKind::EntityReference),
        FieldValue::List(vec![
            ObjectRef::node(f.hall).into(),
            FieldValue::Null,
            ObjectRef::node(gone).into(),
        ]),
    );
    assert_eq!(
        out.map.get("targets"),
        Some(expected_list(&[hash_str("Hall"), 0, 0]))
    );
    // unassigned list slots are not reported
    assert!(out.diagnostics.is_empty());
}

#[test]
fn unsupported_list_element_is_reported() {
    let scene = SceneTree::new();
    let out = single(
        &scene,
        FieldDescriptor::unsupported("names"),
        FieldValue::Null,
    );
    assert!(out.map.get("names").is_none());

    let out = single(
        &scene,
        FieldDescriptor::list("names", FieldKind::Text),
        FieldValue::List(vec![FieldValue::int(1), FieldValue::text("a")]),
    );
    assert_eq!(
        out.map.get("names"),
        Some(expected_list(&[hash_primitive(&Primitive::Int(1)), 0]))
    );
    assert!(
        out.diagnostics
            .iter()
            .any(|d| d.issue == FieldIssue::UnsupportedListElement { index: 1 })
    );
}

// ── references ───────────────────────────────────────────────────

#[test]
fn behaviour_reference_prefers_stable_identity() {
    let f = Fixture::new();
    let value: FieldValue = ObjectRef::behaviour(f.component).into();

    let out = single(&f.scene, FieldDescriptor::component("door"), value.clone());
    assert_eq!(out.map.get("door"), Some(hash_str("World/Hall/Door§Door")));

    let marker = f.scene.attach_marker(f.door).unwrap();
    let out = single(&f.scene, FieldDescriptor::component("door"), value.clone());
    assert_eq!(
        out.map.get("door"),
        Some(hash_str(&format!("{}§Door", marker.id())))
    );

    // moving the node does not matter once it has an identity
    f.scene.reparent(f.door, Some(f.world)).unwrap();
    let moved = single(&f.scene, FieldDescriptor::component("door"), value);
    assert_eq!(moved.map.get("door"), out.map.get("door"));
}

#[test]
fn component_reference_uses_path_and_name() {
    let f = Fixture::new();
    f.scene.attach_marker(f.door).unwrap();
    let out = single(
        &f.scene,
        FieldDescriptor::component("collider"),
        ObjectRef::component(f.component).into(),
    );
    assert_eq!(out.map.get("collider"), Some(hash_str("World/Hall/Door§Door")));
}

#[test]
fn node_reference_falls_back_to_path() {
    let f = Fixture::new();
    let value: FieldValue = ObjectRef::node(f.hall).into();

    let out = single(&f.scene, FieldDescriptor::entity("room"), value.clone());
    assert_eq!(out.map.get("room"), Some(hash_str("World/Hall")));

    f.scene.rename(f.world, "Level1").unwrap();
    let renamed = single(&f.scene, FieldDescriptor::entity("room"), value.clone());
    assert_eq!(renamed.map.get("room"), Some(hash_str("Level1/Hall")));

    let marker = f.scene.attach_marker(f.hall).unwrap();
    let out = single(&f.scene, FieldDescriptor::entity("room"), value);
    assert_eq!(
        out.map.get("room"),
        Some(hash_str(&format!("{}§Hall", marker.id())))
    );
}

#[test]
fn unassigned_reference_is_zero() {
    let f = Fixture::new();
    let gone = Handle::new(404);
    for value in [
        ObjectRef::behaviour(gone),
        ObjectRef::component(gone),
        ObjectRef::node(gone),
    ] {
        let out = single(&f.scene, FieldDescriptor::entity("link"), value.into());
        assert_eq!(out.map.get("link"), Some(0));
        assert!(out.diagnostics.iter().any(|d| d.issue
            == FieldIssue::Unassigned(ResolveError::Unassigned(gone))));
    }
}

// ── event bindings ───────────────────────────────────────────────

#[test]
fn empty_binding_is_zero() {
    let scene = SceneTree::new();
    let out = single(
        &scene,
        FieldDescriptor::events("on_open"),
        EventBinding::new().into(),
    );
    assert_eq!(out.map.get("on_open"), Some(0));
}

#[test]
fn binding_hashes_call_signature() {
    let f = Fixture::new();
    let binding = EventBinding::new()
        .with_call(PersistentCall::new(None, "Close"))
        .with_call(PersistentCall::new(Some(f.component), "Open").with_bool(true))
        .with_call(PersistentCall::new(Some(f.component), "SetSpeed").with_int(3))
        .with_call(PersistentCall::new(Some(f.component), "Focus").with_entity(Some(f.hall)))
        .with_call(PersistentCall::new(Some(f.component), "Ring"));
    let out = single(&f.scene, FieldDescriptor::events("on_open"), binding.into());
    assert_eq!(
        out.map.get("on_open"),
        Some(hash_str(
            "unresolved§Door§Open§true§Door§SetSpeed§3§Door§Focus§Hall§Door§Ring"
        ))
    );
    assert!(out.diagnostics.is_empty());
}

#[test]
fn unsupported_parameter_contributes_empty_token() {
    let f = Fixture::new();
    let binding = EventBinding::new().with_call(
        PersistentCall::new(Some(f.component), "Play").with_other_parameter("AudioClip"),
    );
    let out = single(&f.scene, FieldDescriptor::events("on_open"), binding.into());
    assert_eq!(out.map.get("on_open"), Some(hash_str("Door§Play§")));
    assert_eq!(
        out.diagnostics[0].issue,
        FieldIssue::UnsupportedParameter {
            method: "Play".into(),
            type_name: "AudioClip".into()
        }
    );
}

#[test]
fn argument_change_changes_binding_hash() {
    let f = Fixture::new();
    let call = |speed| {
        EventBinding::new()
            .with_call(PersistentCall::new(Some(f.component), "SetSpeed").with_float(speed))
    };
    let slow = single(&f.scene, FieldDescriptor::events("e"), call(1.0).into());
    let fast = single(&f.scene, FieldDescriptor::events("e"), call(2.5).into());
    assert_ne!(slow.map.get("e"), fast.map.get("e"));
}

// ── skipped fields ───────────────────────────────────────────────

#[test]
fn unsupported_value_is_skipped() {
    let scene = SceneTree::new();
    let out = single(
        &scene,
        FieldDescriptor::text("blob"),
        FieldValue::Unsupported {
            type_name: "Texture2D".into(),
        },
    );
    assert!(out.map.is_empty());
    assert_eq!(
        out.diagnostics[0].issue,
        FieldIssue::Unsupported {
            type_name: "Texture2D".into()
        }
    );
}

#[test]
fn reserved_duplicate_and_missing_fields_are_skipped() {
    let scene = SceneTree::new();
    let target = FixedTarget(vec![
        (FieldDescriptor::primitive("a;b"), Some(FieldValue::int(1))),
        (FieldDescriptor::primitive("speed"), Some(FieldValue::int(1))),
        (FieldDescriptor::primitive("speed"), Some(FieldValue::int(2))),
        (FieldDescriptor::text("ghost"), None),
    ]);
    let out = fingerprint(&scene, &target);
    assert_eq!(out.map.len(), 1);
    assert_eq!(out.map.get("speed"), Some(hash_primitive(&Primitive::Int(1))));

    let issues: Vec<(&str, &FieldIssue)> = out
        .diagnostics
        .iter()
        .map(|d| (d.field.as_str(), &d.issue))
        .collect();
    assert_eq!(
        issues,
        vec![
            ("a;b", &FieldIssue::ReservedName),
            ("speed", &FieldIssue::DuplicateName),
            ("ghost", &FieldIssue::MissingValue),
        ]
    );
}

#[test]
fn kind_mismatch_is_reported_but_hashed() {
    let scene = SceneTree::new();
    let out = single(&scene, FieldDescriptor::text("label"), FieldValue::int(3));
    assert_eq!(out.map.get("label"), Some(hash_primitive(&Primitive::Int(3))));
    assert!(matches!(
        out.diagnostics[0].issue,
        FieldIssue::KindMismatch {
            declared: FieldKind::Text
        }
    ));
}

// ── properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn list_hash_is_deterministic(values in prop::collection::vec(any::<i64>(), 0..16)) {
        let scene = SceneTree::new();
        let record = Record::new(Handle::new(1), "Probe").with_field(
            FieldDescriptor::list("xs", FieldKind::Primitive),
            FieldValue::int_list(values.clone()),
        );
        let a = fingerprint(&scene, &record).map.get("xs");
        let b = fingerprint(&scene, &record).map.get("xs");
        prop_assert_eq!(a, b);

        let hashes: Vec<i32> = values.iter().map(|v| hash_primitive(&Primitive::Int(*v))).collect();
        prop_assert_eq!(a, Some(expected_list(&hashes)));
    }

    #[test]
    fn swapping_neighbours_changes_list_hash(
        values in prop::collection::vec(any::<i64>(), 2..8),
        at in any::<prop::sample::Index>(),
    ) {
        let i = at.index(values.len() - 1);
        prop_assume!(values[i] != values[i + 1]);
        let mut swapped = values.clone();
        swapped.swap(i, i + 1);

        let scene = SceneTree::new();
        let original = single(
            &scene,
            FieldDescriptor::list("xs", FieldKind::Primitive),
            FieldValue::int_list(values),
        );
        let reordered = single(
            &scene,
            FieldDescriptor::list("xs", FieldKind::Primitive),
            FieldValue::int_list(swapped),
        );
        prop_assert_ne!(original.map.get("xs"), reordered.map.get("xs"));
    }
}
