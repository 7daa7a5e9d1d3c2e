//! Network and configuration validation logic.

use std::collections::HashSet;

use crate::schema::{NetworkDef, PreprocessConfig};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Structural checks on a network: unique flowline ids, usable lengths and
/// arbolate sums, and edge rows whose source is a known flowline.
///
/// Edge targets may name flowlines outside the table; they drain out of the
/// study area and are treated as outlets.
pub fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    check_version(network.version)?;

    let mut ids = HashSet::new();
    for f in &network.flowlines {
        if !ids.insert(f.id) {
            return Err(ValidationError::DuplicateId {
                id: f.id.to_string(),
                context: "flowlines".to_string(),
            });
        }
        positive(&format!("flowline {} length_km", f.id), f.length_km)?;
        non_negative(
            &format!("flowline {} nhd_arbolate_sum_km", f.id),
            f.nhd_arbolate_sum_km,
        )?;
    }

    for edge in &network.edges {
        if !ids.contains(&edge.from_id) {
            return Err(ValidationError::MissingReference {
                id: edge.from_id.to_string(),
                context: "edge from_id".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_config(config: &PreprocessConfig) -> Result<(), ValidationError> {
    check_version(config.version)?;

    let culling = &config.culling;
    if let Some(t) = culling.asum_thresh_km {
        non_negative("culling.asum_thresh_km", t)?;
    }
    if let Some(t) = culling.intermittent_asum_thresh_km {
        non_negative("culling.intermittent_asum_thresh_km", t)?;
    }
    if let Some(t) = config.minor_asum_thresh_km {
        non_negative("minor_asum_thresh_km", t)?;
    }

    if config.isolation.walk_limit == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "isolation.walk_limit".to_string(),
            value: "0".to_string(),
            reason: "must allow at least one step; omit for no limit".to_string(),
        });
    }

    let bounds = config.elevation_bounds;
    if !(bounds.min.is_finite() && bounds.max.is_finite() && bounds.min < bounds.max) {
        return Err(ValidationError::InvalidValue {
            field: "elevation_bounds".to_string(),
            value: format!("({}, {})", bounds.min, bounds.max),
            reason: "min must be below max".to_string(),
        });
    }

    for (from, to) in &config.known_connections {
        if from == to {
            return Err(ValidationError::InvalidValue {
                field: "known_connections".to_string(),
                value: format!("{from}: {to}"),
                reason: "a flowline cannot route to itself".to_string(),
            });
        }
    }

    let width = config.width;
    positive("width.a", width.a)?;
    if !width.b.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "width.b".to_string(),
            value: width.b.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    non_negative("width.minimum_width", width.minimum_width)?;

    Ok(())
}

/// Known connections must start at a flowline of the network.
pub fn validate_known_connections(
    config: &PreprocessConfig,
    network: &NetworkDef,
) -> Result<(), ValidationError> {
    let ids: HashSet<_> = network.flowlines.iter().map(|f| f.id).collect();
    for from in config.known_connections.keys() {
        if !ids.contains(from) {
            return Err(ValidationError::MissingReference {
                id: from.to_string(),
                context: "known_connections".to_string(),
            });
        }
    }
    Ok(())
}

fn check_version(version: u32) -> Result<(), ValidationError> {
    if version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion { version });
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite and positive".to_string(),
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite and non-negative".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EdgeDef, FlowlineDef};
    use sn_core::FlowlineId;

    fn id(raw: u64) -> FlowlineId {
        FlowlineId::new(raw).unwrap()
    }

    fn flowline(raw: u64) -> FlowlineDef {
        FlowlineDef {
            id: id(raw),
            length_km: 1.0,
            elevation_metric: Some(10.0),
            nhd_arbolate_sum_km: 1.0,
            fcode: 46006,
            in_active_set: true,
            in_domain: true,
            nhd_min_elev: None,
        }
    }

    fn network(flowlines: Vec<FlowlineDef>, edges: Vec<(u64, u64)>) -> NetworkDef {
        NetworkDef {
            version: 1,
            name: None,
            flowlines,
            edges: edges
                .into_iter()
                .map(|(from, to)| EdgeDef {
                    from_id: id(from),
                    to_id: FlowlineId::new(to),
                })
                .collect(),
        }
    }

    #[test]
    fn duplicate_flowline_rejected() {
        let net = network(vec![flowline(1), flowline(1)], vec![]);
        assert!(matches!(
            validate_network(&net),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn edge_from_unknown_flowline_rejected() {
        let net = network(vec![flowline(1)], vec![(1, 0), (2, 1)]);
        assert!(matches!(
            validate_network(&net),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn edge_to_unknown_flowline_allowed() {
        let net = network(vec![flowline(1)], vec![(1, 99)]);
        validate_network(&net).unwrap();
    }

    #[test]
    fn negative_length_rejected() {
        let mut f = flowline(1);
        f.length_km = -2.0;
        let net = network(vec![f], vec![]);
        assert!(matches!(
            validate_network(&net),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_length_rejected() {
        let mut f = flowline(1);
        f.length_km = 0.0;
        let net = network(vec![f], vec![]);
        match validate_network(&net) {
            Err(ValidationError::InvalidValue { field, .. }) => {
                assert_eq!(field, "flowline 1 length_km");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn future_version_rejected() {
        let mut net = network(vec![], vec![]);
        net.version = crate::migrate::LATEST_VERSION + 1;
        assert!(matches!(
            validate_network(&net),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&PreprocessConfig::default()).unwrap();
    }

    #[test]
    fn bad_config_values_rejected() {
        let mut cfg = PreprocessConfig::default();
        cfg.isolation.walk_limit = Some(0);
        assert!(validate_config(&cfg).is_err());

        let mut cfg = PreprocessConfig::default();
        cfg.elevation_bounds.min = 200.0;
        cfg.elevation_bounds.max = 100.0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = PreprocessConfig::default();
        cfg.known_connections.insert(id(3), id(3));
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn known_connection_source_must_exist() {
        let net = network(vec![flowline(1)], vec![]);
        let mut cfg = PreprocessConfig::default();
        cfg.known_connections.insert(id(7), id(1));
        assert!(matches!(
            validate_known_connections(&cfg, &net),
            Err(ValidationError::MissingReference { .. })
        ));
    }
}
