use serde_json::Value;

use crate::errors::LoadError;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations are applied sequentially: v1→v2, v2→v3, etc.
/// Version 0 presets stored `diameter` instead of `outerRadius`.
pub fn migrate(params: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    let mut params = params;
    let mut version = from_version;
    while version < to_version {
        params = match version {
            0 => migrate_v0_to_v1(params, version)?,
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: version,
                    to: to_version,
                    reason: format!("no migration path from v{} to v{}", version, to_version),
                })
            }
        };
        version += 1;
    }
    Ok(params)
}

fn migrate_v0_to_v1(mut params: Value, version: u32) -> Result<Value, LoadError> {
    let failed = |reason: &str| LoadError::MigrationFailed {
        from: version,
        to: version + 1,
        reason: reason.to_string(),
    };
    let map = params
        .as_object_mut()
        .ok_or_else(|| failed("params is not an object"))?;
    let diameter = map
        .remove("diameter")
        .and_then(|d| d.as_f64())
        .ok_or_else(|| failed("missing numeric diameter"))?;
    map.insert("outerRadius".to_string(), Value::from(diameter / 2.0));
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v0_diameter_becomes_radius() {
        let v0 = json!({"height": 10.0, "diameter": 30.0, "wallThickness": 2.0, "closedBottom": false});
        let v1 = migrate(v0, 0, 1).unwrap();
        assert_eq!(v1["outerRadius"], json!(15.0));
        assert!(v1.get("diameter").is_none());
    }

    #[test]
    fn same_version_is_untouched() {
        let v = json!({"height": 1.0});
        assert_eq!(migrate(v.clone(), 1, 1).unwrap(), v);
    }

    #[test]
    fn v0_without_diameter_fails() {
        let err = migrate(json!({"height": 1.0}), 0, 1).unwrap_err();
        assert!(matches!(err, LoadError::MigrationFailed { from: 0, to: 1, .. }));
    }
}
