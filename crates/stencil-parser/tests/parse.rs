use stencil_core::model::{ContainerChild, Reference, SubGeometry};
use stencil_parser::{error::ErrorCode, parse_document};

#[test]
fn test_symbol_document() {
    let source = r#"{
        "version": "1.0",
        "fileType": 0,
        "frames": [{
            "class": "frame",
            "id": "page",
            "childObjects": [
                {
                    "class": "symbolInstance",
                    "id": "I1",
                    "masterId": "M",
                    "overrideValues": [{
                        "class": "overrideValue",
                        "objectId": ["P"],
                        "overrideName": "style.fills.0.color",
                        "overrideValue": { "red": 0, "green": 0, "blue": 1, "alpha": 1 }
                    }]
                }
            ]
        }],
        "references": [{
            "class": "symbolMaster",
            "id": "M",
            "childObjects": [{
                "class": "path",
                "id": "P",
                "style": { "fills": [{ "class": "fill", "isEnabled": true,
                    "color": { "red": 1, "green": 0, "blue": 0, "alpha": 1 } }] },
                "shape": { "subshapes": [{ "subGeometry": { "class": "rectangle" } }] }
            }]
        }]
    }"#;

    let model = parse_document(source).expect("Failed to parse");

    let frame = &model.frames[0];
    assert_eq!(frame.object.id, "page");
    match &frame.child_objects[0] {
        ContainerChild::SymbolInstance(instance) => {
            assert_eq!(instance.master_id, "M");
            assert_eq!(instance.override_values.len(), 1);
            assert_eq!(instance.override_values[0].object_id_chain, vec!["P"]);
        }
        other => panic!("Expected symbol instance, got {}", other.class_name()),
    }

    let references = model.references.as_ref().expect("references");
    let Reference::SymbolMaster(master) = &references[0] else {
        panic!("Expected symbol master");
    };
    let ContainerChild::Path(path) = &master.child_objects[0] else {
        panic!("Expected path");
    };
    let subshape = &path.shape.as_ref().expect("shape").subshapes[0];
    assert!(matches!(
        subshape.sub_geometry.as_deref(),
        Some(SubGeometry::Rectangle(_))
    ));
}

#[test]
fn test_duplicate_ids_in_nested_containers() {
    let source = r#"{
        "frames": [
            { "class": "frame", "id": "a", "childObjects": [
                { "class": "group", "id": "g", "childObjects": [
                    { "class": "image", "id": "x", "imageFileName": "x.png" }
                ]}
            ]},
            { "class": "frame", "id": "b", "childObjects": [
                { "class": "text", "id": "x", "content": "again" }
            ]}
        ]
    }"#;

    let err = parse_document(source).expect_err("duplicate id must be rejected");

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
    assert!(err.to_string().contains("`x`"));
}

#[test]
fn test_round_trip_keeps_unknown_fields() {
    let source = r#"{
        "version": "1.0",
        "fileType": 0,
        "frames": [{
            "class": "frame",
            "id": "page",
            "transformedBounds": { "x": 0, "y": 0, "width": 10, "height": 10 },
            "childObjects": []
        }]
    }"#;

    let model = parse_document(source).expect("Failed to parse");
    let value = serde_json::to_value(&model).expect("Failed to serialize");

    assert_eq!(value["frames"][0]["class"], "frame");
    assert_eq!(value["frames"][0]["transformedBounds"]["width"], 10);
}
