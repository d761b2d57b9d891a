use tube_types::CylinderParams;

/// Download name encoding the parameters, e.g. `cylinder-50x80-wall3-closed.3mf`.
///
/// Diameter, height and wall thickness are rounded to whole millimetres.
pub fn artifact_filename(params: &CylinderParams) -> String {
    format!(
        "cylinder-{}x{}-wall{}-{}.3mf",
        whole_mm(params.diameter()),
        whole_mm(params.height),
        whole_mm(params.wall_thickness),
        if params.closed_bottom { "closed" } else { "open" },
    )
}

fn whole_mm(value: f64) -> i64 {
    value.round() as i64
}
