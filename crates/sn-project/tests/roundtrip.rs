use std::collections::BTreeMap;

use sn_core::{FlowlineId, LengthUnit};
use sn_project::schema::*;
use sn_project::{
    LATEST_VERSION, ProjectError, load_json, load_yaml, save_json, save_yaml, validate_network,
};

fn id(raw: u64) -> FlowlineId {
    FlowlineId::new(raw).unwrap()
}

fn sample_network() -> NetworkDef {
    NetworkDef {
        version: LATEST_VERSION,
        name: Some("Little Plover".to_string()),
        flowlines: vec![
            FlowlineDef {
                id: id(13293750),
                length_km: 1.2,
                elevation_metric: Some(321.5),
                nhd_arbolate_sum_km: 8.4,
                fcode: 46006,
                in_active_set: true,
                in_domain: true,
                nhd_min_elev: Some(320.1),
            },
            FlowlineDef {
                id: id(13294110),
                length_km: 0.7,
                elevation_metric: None,
                nhd_arbolate_sum_km: 2.1,
                fcode: 46003,
                in_active_set: false,
                in_domain: true,
                nhd_min_elev: None,
            },
        ],
        edges: vec![
            EdgeDef {
                from_id: id(13294110),
                to_id: Some(id(13293750)),
            },
            EdgeDef {
                from_id: id(13293750),
                to_id: None,
            },
        ],
    }
}

#[test]
fn roundtrip_yaml_network() {
    let network = sample_network();
    validate_network(&network).unwrap();

    let path = std::env::temp_dir().join("sn_project_roundtrip_network.yaml");
    save_yaml(&path, &network).unwrap();
    let loaded: NetworkDef = load_yaml(&path).unwrap();

    assert_eq!(network, loaded);
}

#[test]
fn roundtrip_json_network() {
    let network = sample_network();
    let path = std::env::temp_dir().join("sn_project_roundtrip_network.json");
    save_json(&path, &network).unwrap();
    let loaded: NetworkDef = load_json(&path).unwrap();

    assert_eq!(network, loaded);
}

#[test]
fn outlet_written_as_zero() {
    let yaml = serde_yaml::to_string(&sample_network()).unwrap();
    assert!(yaml.contains("to_id: 0"));
}

#[test]
fn roundtrip_yaml_config() {
    let config = PreprocessConfig {
        minor_asum_thresh_km: Some(20.0),
        known_connections: BTreeMap::from([(id(17955195), id(17955197))]),
        output_length_units: LengthUnit::Feet,
        culling: CullingDef {
            asum_thresh_km: Some(5.0),
            intermittent_asum_thresh_km: Some(10.0),
            ..CullingDef::default()
        },
        ..PreprocessConfig::default()
    };

    let path = std::env::temp_dir().join("sn_project_roundtrip_config.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded: PreprocessConfig = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn sparse_config_takes_defaults() {
    let config: PreprocessConfig =
        serde_yaml::from_str("output_length_units: feet\nisolation:\n  walk_limit: 25\n").unwrap();
    assert_eq!(config.version, LATEST_VERSION);
    assert_eq!(config.isolation.walk_limit, Some(25));
    assert_eq!(config.isolation.excluded_fcodes, vec![56600]);
    assert_eq!(config.width, WidthDef::default());
    assert!(config.culling.cull_invalid);
    assert_eq!(config.output_length_units, LengthUnit::Feet);
}

#[test]
fn outlet_as_flowline_id_rejected() {
    let yaml = "flowlines:\n  - id: 0\n    length_km: 1.0\n    nhd_arbolate_sum_km: 1.0\n";
    assert!(serde_yaml::from_str::<NetworkDef>(yaml).is_err());
}

#[test]
fn load_rejects_invalid_network() {
    let mut network = sample_network();
    network.flowlines[0].length_km = -1.0;
    let path = std::env::temp_dir().join("sn_project_invalid_network.json");
    // written unchecked, then refused on load
    std::fs::write(&path, serde_json::to_string(&network).unwrap()).unwrap();

    let result = load_json::<NetworkDef>(&path);
    assert!(matches!(result, Err(ProjectError::Validation(_))));
}
