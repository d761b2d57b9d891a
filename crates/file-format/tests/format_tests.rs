use file_format::*;
use tube_kernel::{SolidBuilder, TessellatedBuilder, TessellationConfig};
use tube_types::{CylinderParams, ParamLimits};

// ── Preset Round-Trip Tests ──────────────────────────────────────────────

#[test]
fn preset_save_then_load_preserves_params() {
    let params = CylinderParams::new(80.0, 25.0, 3.0, false);
    let json = save_preset("pen cup", &params).unwrap();
    assert!(json.contains("\"format\": \"tube-preset\""));

    let loaded = load_preset(&json, &ParamLimits::default()).unwrap();
    assert_eq!(loaded.name, "pen cup");
    assert_eq!(loaded.params, params);
}

#[test]
fn preset_values_are_clamped_on_load() {
    let json = r#"{
        "format": "tube-preset",
        "version": 1,
        "params": {"height": 5000.0, "outerRadius": 1.0, "wallThickness": 3.0, "closedBottom": true}
    }"#;
    let loaded = load_preset(json, &ParamLimits::default()).unwrap();
    assert_eq!(loaded.params.height, 200.0);
    assert_eq!(loaded.params.outer_radius, 5.0);
    assert_eq!(loaded.name, "");
}

#[test]
fn preset_v0_is_migrated() {
    let json = r#"{
        "format": "tube-preset",
        "version": 0,
        "name": "old",
        "params": {"height": 60.0, "diameter": 40.0, "wallThickness": 2.0, "closedBottom": true}
    }"#;
    let loaded = load_preset(json, &ParamLimits::default()).unwrap();
    assert_eq!(loaded.params.outer_radius, 20.0);
}

// ── Preset Error Tests ───────────────────────────────────────────────────

#[test]
fn preset_rejects_future_version() {
    let json = r#"{"format": "tube-preset", "version": 99, "params": {}}"#;
    assert_eq!(
        load_preset(json, &ParamLimits::default()),
        Err(LoadError::FutureVersion {
            file_version: 99,
            supported_version: FORMAT_VERSION
        })
    );
}

#[test]
fn preset_rejects_unknown_format() {
    let json = r#"{"format": "mesh-archive", "version": 1, "params": {}}"#;
    assert!(matches!(
        load_preset(json, &ParamLimits::default()),
        Err(LoadError::UnknownFormat(f)) if f == "mesh-archive"
    ));
}

#[test]
fn preset_rejects_garbage() {
    assert!(matches!(
        load_preset("not json", &ParamLimits::default()),
        Err(LoadError::ParseError(_))
    ));
}

// ── Artifact Tests ───────────────────────────────────────────────────────

#[test]
fn artifact_for_tessellated_cup() {
    let params = CylinderParams::new(80.0, 25.0, 3.0, true);
    let mesh = TessellatedBuilder::new(TessellationConfig { segments: 24 })
        .build(&params)
        .unwrap();

    let artifact = ThreeMfModelSerializer
        .artifact(&mesh, artifact_filename(&params))
        .unwrap();
    assert_eq!(artifact.filename, "cylinder-50x80-wall3-closed.3mf");
    assert_eq!(artifact.mime_type, "model/3mf");

    let xml = String::from_utf8(artifact.bytes).unwrap();
    // welding leaves exactly as many triangles as the render mesh
    assert_eq!(xml.matches("<triangle ").count(), mesh.triangle_count());
    assert!(xml.matches("<vertex ").count() < mesh.vertex_count());
}

#[test]
fn stl_artifact_size_matches_triangles() {
    let params = CylinderParams::new(20.0, 10.0, 2.0, false);
    let mesh = TessellatedBuilder::new(TessellationConfig { segments: 12 })
        .build(&params)
        .unwrap();
    let bytes = StlSerializer.serialize(&mesh).unwrap();
    assert_eq!(bytes.len(), 84 + mesh.triangle_count() * 50);
}
