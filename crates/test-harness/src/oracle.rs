//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics,
//! so a test can collect every failure in one pass.

use std::collections::HashMap;

use tube_types::{CylinderParams, RenderMesh};

use crate::helpers::{expected_volume, position_key, signed_volume};

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

/// Every directed edge must be matched by exactly one opposite edge once
/// coincident vertices are merged: the surface is closed and consistently wound.
pub fn check_watertight(mesh: &RenderMesh) -> OracleVerdict {
    let mut ids: HashMap<[u32; 3], usize> = HashMap::new();
    let welded: Vec<usize> = (0..mesh.vertex_count())
        .map(|i| {
            let next = ids.len();
            *ids.entry(position_key(mesh.position(i as u32))).or_insert(next)
        })
        .collect();

    let mut edges: HashMap<(usize, usize), i64> = HashMap::new();
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| welded[i as usize]);
        for (from, to) in [(a, b), (b, c), (c, a)] {
            *edges.entry((from, to)).or_insert(0) += 1;
        }
    }

    let unmatched = edges
        .iter()
        .filter(|&(&(from, to), &count)| count != 1 || edges.get(&(to, from)) != Some(&1))
        .count();
    if unmatched == 0 {
        OracleVerdict::pass(
            "watertight",
            format!("{} welded vertices, {} directed edges", ids.len(), edges.len()),
        )
    } else {
        OracleVerdict::fail_val(
            "watertight",
            format!("{unmatched} of {} directed edges unmatched", edges.len()),
            unmatched as f64,
        )
    }
}

/// The enclosed volume matches the faceted part for `params`.
pub fn check_volume(
    mesh: &RenderMesh,
    params: &CylinderParams,
    segments: usize,
    rel_tol: f64,
) -> OracleVerdict {
    let expected = expected_volume(params, segments);
    let actual = signed_volume(mesh);
    let rel_err = (actual - expected).abs() / expected.abs().max(f64::EPSILON);
    let detail = format!("volume {actual:.3} vs expected {expected:.3} (rel err {rel_err:.2e})");
    if rel_err <= rel_tol {
        OracleVerdict::pass_val("volume", detail, actual)
    } else {
        OracleVerdict::fail_val("volume", detail, actual)
    }
}

/// The mesh sits on z = 0, reaches `height` and stays within the outer radius.
pub fn check_bounds(mesh: &RenderMesh, params: &CylinderParams, tol: f64) -> OracleVerdict {
    let Some(bounds) = mesh.bounds() else {
        return OracleVerdict::fail("bounds", "mesh is empty".to_string());
    };
    let r = params.outer_radius;
    let within = |actual: f64, expected: f64| (actual - expected).abs() <= tol;
    let radial_ok = bounds.min[0] >= -r - tol
        && bounds.min[1] >= -r - tol
        && bounds.max[0] <= r + tol
        && bounds.max[1] <= r + tol;
    let detail = format!("min {:?} max {:?}", bounds.min, bounds.max);
    if within(bounds.min[2], 0.0) && within(bounds.max[2], params.height) && radial_ok {
        OracleVerdict::pass("bounds", detail)
    } else {
        OracleVerdict::fail("bounds", detail)
    }
}

/// Run every mesh oracle for `params`.
pub fn verify_mesh(mesh: &RenderMesh, params: &CylinderParams, segments: usize) -> Vec<OracleVerdict> {
    vec![
        check_watertight(mesh),
        check_volume(mesh, params, segments, 1e-4),
        check_bounds(mesh, params, 1e-3),
    ]
}
