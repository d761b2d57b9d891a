//! Assertion helpers with diagnostic output.

use tube_types::{CylinderParams, RenderMesh};

use crate::helpers::HarnessError;
use crate::oracle::{verify_mesh, OracleVerdict};

/// Assert two parameter sets agree within `tol` on every numeric field.
pub fn assert_params_close(
    actual: &CylinderParams,
    expected: &CylinderParams,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let fields = [
        ("height", actual.height, expected.height),
        ("outerRadius", actual.outer_radius, expected.outer_radius),
        ("wallThickness", actual.wall_thickness, expected.wall_thickness),
    ];
    for (name, got, want) in fields {
        if (got - want).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!("[{ctx}] {name}: expected {want}, got {got} (tol={tol})"),
            });
        }
    }
    if actual.closed_bottom != expected.closed_bottom {
        return Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{ctx}] closedBottom: expected {}, got {}",
                expected.closed_bottom, actual.closed_bottom
            ),
        });
    }
    Ok(())
}

/// Assert the mesh passes every oracle for `params`.
pub fn assert_mesh_valid(
    mesh: &RenderMesh,
    params: &CylinderParams,
    segments: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let failures: Vec<OracleVerdict> = verify_mesh(mesh, params, segments)
        .into_iter()
        .filter(|v| !v.passed)
        .collect();
    match failures.first() {
        None => Ok(()),
        Some(first) => Err(HarnessError::OracleFailure {
            oracle: first.oracle_name.clone(),
            detail: format!(
                "[{ctx}] {} ({} oracle(s) failed)",
                first.detail,
                failures.len()
            ),
        }),
    }
}

/// Assert a sequence of rotation samples never jumps by more than `max_step`.
pub fn assert_continuous(samples: &[f64], max_step: f64, ctx: &str) -> Result<(), HarnessError> {
    for (i, pair) in samples.windows(2).enumerate() {
        let step = (pair[1] - pair[0]).abs();
        if step > max_step {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{ctx}] jump of {step:.4} between samples {i} and {} (max {max_step})",
                    i + 1
                ),
            });
        }
    }
    Ok(())
}
