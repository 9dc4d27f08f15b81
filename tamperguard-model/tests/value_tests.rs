use pretty_assertions::assert_eq;
use tamperguard_model::{
    Color, EventBinding, FieldValue, ObjectRef, ParameterKind, PersistentCall, Primitive, Rect,
    ReferenceKind, Vector2, Vector3,
};
use tamperguard_types::Handle;

// ── Canonical text ───────────────────────────────────────────────

#[test]
fn color_canonical_text() {
    let c = Color::rgba(1.0, 0.5, 0.0, 1.0);
    assert_eq!(c.to_string(), "RGBA(1, 0.5, 0, 1)");
}

#[test]
fn vector_canonical_text() {
    assert_eq!(Vector2::new(0.25, -1.0).to_string(), "(0.25, -1)");
    assert_eq!(Vector3::new(1.5, 2.0, 3.125).to_string(), "(1.5, 2, 3.125)");
}

#[test]
fn vector_text_keeps_full_precision() {
    let a = Vector3::new(1.01, 0.0, 0.0).to_string();
    let b = Vector3::new(1.02, 0.0, 0.0).to_string();
    assert_ne!(a, b);
}

#[test]
fn rect_canonical_text() {
    let r = Rect::new(0.0, 10.0, 200.0, 50.5);
    assert_eq!(r.to_string(), "(x:0, y:10, width:200, height:50.5)");
}

// ── Constructors ─────────────────────────────────────────────────

#[test]
fn primitive_shorthands() {
    assert_eq!(FieldValue::int(5), FieldValue::Primitive(Primitive::Int(5)));
    assert_eq!(FieldValue::bool(true), FieldValue::Primitive(Primitive::Bool(true)));
    assert_eq!(FieldValue::float(2.5), FieldValue::Primitive(Primitive::Float(2.5)));
}

#[test]
fn int_list_preserves_order() {
    let list = FieldValue::int_list([3, 7, 2]);
    assert_eq!(
        list,
        FieldValue::List(vec![FieldValue::int(3), FieldValue::int(7), FieldValue::int(2)])
    );
}

#[test]
fn object_ref_constructors_set_kind() {
    let h = Handle::new(4);
    assert_eq!(ObjectRef::node(h).kind, ReferenceKind::Node);
    assert_eq!(ObjectRef::component(h).kind, ReferenceKind::Component);
    assert_eq!(ObjectRef::behaviour(h).kind, ReferenceKind::Behaviour);
}

// ── Event bindings ───────────────────────────────────────────────

#[test]
fn persistent_call_builders_set_parameter() {
    let call = PersistentCall::new(Some(Handle::new(1)), "SetSpeed").with_float(2.5);
    assert_eq!(call.parameter, Some(ParameterKind::Float));
    assert_eq!(call.arguments.float_arg, 2.5);

    let call = PersistentCall::new(None, "Open");
    assert_eq!(call.parameter, None);
}

#[test]
fn event_binding_counts_calls() {
    let binding = EventBinding::new()
        .with_call(PersistentCall::new(Some(Handle::new(1)), "Open"))
        .with_call(PersistentCall::new(Some(Handle::new(2)), "Close").with_bool(true));
    assert_eq!(binding.len(), 2);
    assert!(!binding.is_empty());
    assert!(EventBinding::new().is_empty());
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn field_value_json_shape() {
    let json = serde_json::to_string(&FieldValue::int(6)).unwrap();
    assert_eq!(json, r#"{"primitive":{"int":6}}"#);

    let json = serde_json::to_string(&FieldValue::Null).unwrap();
    assert_eq!(json, r#""null""#);
}

#[test]
fn field_value_serde_roundtrip() {
    let value = FieldValue::List(vec![
        FieldValue::Reference(ObjectRef::node(Handle::new(3))),
        FieldValue::Null,
        FieldValue::Events(
            EventBinding::new()
                .with_call(PersistentCall::new(Some(Handle::new(9)), "Say").with_text("hi")),
        ),
        FieldValue::Color(Color::rgba(0.0, 0.0, 1.0, 1.0)),
    ]);
    let json = serde_json::to_string(&value).unwrap();
    let parsed: FieldValue = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, value);
}

#[test]
fn persistent_call_arguments_default_when_missing() {
    let call: PersistentCall =
        serde_json::from_str(r#"{"target": 4, "method": "Open"}"#).unwrap();
    assert_eq!(call.target, Some(Handle::new(4)));
    assert_eq!(call.parameter, None);
    assert_eq!(call.arguments.int_arg, 0);
}
