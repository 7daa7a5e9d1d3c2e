//! Hand edits applied to a network before preprocessing.
//!
//! ```yaml
//! add_flowlines:
//!   - id: 900001
//!     length_km: 0.4
//!     nhd_arbolate_sum_km: 12.0
//!     to_ids: [13293750]
//! drop_flowlines: [13294110]
//! reroute_flowlines:
//!   13293262: 13293750
//! ```
//!
//! Edits run in the order add, drop, reroute.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sn_core::{FlowlineId, downstream_from_raw};

use crate::schema::{EdgeDef, FlowlineDef, NetworkDef};
use crate::validate::ValidationError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditScript {
    pub add_flowlines: Vec<AddedFlowline>,
    pub drop_flowlines: Vec<FlowlineId>,
    /// New downstream id per flowline; 0 makes it an outlet.
    pub reroute_flowlines: BTreeMap<FlowlineId, u64>,
}

/// A flowline row plus its downstream ids (0 or empty for an outlet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddedFlowline {
    #[serde(flatten)]
    pub flowline: FlowlineDef,
    #[serde(default)]
    pub to_ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub added: usize,
    pub dropped: usize,
    pub rerouted: usize,
}

impl EditScript {
    pub fn is_empty(&self) -> bool {
        self.add_flowlines.is_empty()
            && self.drop_flowlines.is_empty()
            && self.reroute_flowlines.is_empty()
    }
}

/// Apply `script` to `network` in place.
///
/// Added rows replace existing rows with the same id, including their edges.
/// Dropping removes the rows and their outgoing edges; edges pointing at a
/// dropped flowline are left and later drain out as outlets. Rerouting a
/// flowline that is not in the network is an error.
pub fn apply_edits(
    network: &mut NetworkDef,
    script: &EditScript,
) -> Result<EditSummary, ValidationError> {
    let mut summary = EditSummary::default();

    if !script.add_flowlines.is_empty() {
        let replaced: BTreeSet<FlowlineId> =
            script.add_flowlines.iter().map(|a| a.flowline.id).collect();
        remove_flowlines(network, &replaced);

        for added in &script.add_flowlines {
            let id = added.flowline.id;
            network.flowlines.push(added.flowline.clone());
            if added.to_ids.is_empty() {
                network.edges.push(EdgeDef {
                    from_id: id,
                    to_id: None,
                });
            }
            for &to in &added.to_ids {
                network.edges.push(EdgeDef {
                    from_id: id,
                    to_id: downstream_from_raw(to),
                });
            }
            summary.added += 1;
        }
    }

    if !script.drop_flowlines.is_empty() {
        let drop: BTreeSet<FlowlineId> = script.drop_flowlines.iter().copied().collect();
        summary.dropped = remove_flowlines(network, &drop);
    }

    for (&id, &to) in &script.reroute_flowlines {
        if !network.flowlines.iter().any(|f| f.id == id) {
            return Err(ValidationError::MissingReference {
                id: id.to_string(),
                context: format!("reroute_flowlines (can't re-route to {to})"),
            });
        }
        network.edges.retain(|e| e.from_id != id);
        network.edges.push(EdgeDef {
            from_id: id,
            to_id: downstream_from_raw(to),
        });
        summary.rerouted += 1;
    }

    Ok(summary)
}

/// Remove rows and outgoing edges for `ids`; returns the number of rows removed.
fn remove_flowlines(network: &mut NetworkDef, ids: &BTreeSet<FlowlineId>) -> usize {
    let before = network.flowlines.len();
    network.flowlines.retain(|f| !ids.contains(&f.id));
    network.edges.retain(|e| !ids.contains(&e.from_id));
    before - network.flowlines.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> FlowlineId {
        FlowlineId::new(raw).unwrap()
    }

    fn flowline(raw: u64, length_km: f64) -> FlowlineDef {
        FlowlineDef {
            id: id(raw),
            length_km,
            elevation_metric: None,
            nhd_arbolate_sum_km: length_km,
            fcode: 46006,
            in_active_set: true,
            in_domain: true,
            nhd_min_elev: None,
        }
    }

    fn base() -> NetworkDef {
        NetworkDef {
            version: 1,
            name: None,
            flowlines: vec![flowline(1, 1.0), flowline(2, 1.0), flowline(3, 1.0)],
            edges: vec![
                EdgeDef {
                    from_id: id(1),
                    to_id: Some(id(2)),
                },
                EdgeDef {
                    from_id: id(2),
                    to_id: Some(id(3)),
                },
                EdgeDef {
                    from_id: id(3),
                    to_id: None,
                },
            ],
        }
    }

    fn targets(net: &NetworkDef, from: u64) -> Vec<Option<FlowlineId>> {
        net.edges
            .iter()
            .filter(|e| e.from_id == id(from))
            .map(|e| e.to_id)
            .collect()
    }

    #[test]
    fn add_replaces_existing_row() {
        let mut net = base();
        let script = EditScript {
            add_flowlines: vec![AddedFlowline {
                flowline: flowline(2, 5.0),
                to_ids: vec![0],
            }],
            ..EditScript::default()
        };
        let summary = apply_edits(&mut net, &script).unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(net.flowlines.len(), 3);
        let row = net.flowlines.iter().find(|f| f.id == id(2)).unwrap();
        assert_eq!(row.length_km, 5.0);
        assert_eq!(targets(&net, 2), vec![None]);
    }

    #[test]
    fn drop_removes_rows_and_outgoing_edges() {
        let mut net = base();
        let script = EditScript {
            drop_flowlines: vec![id(2), id(42)],
            ..EditScript::default()
        };
        let summary = apply_edits(&mut net, &script).unwrap();
        assert_eq!(summary.dropped, 1);
        assert!(targets(&net, 2).is_empty());
        // 1 still points at the dropped flowline
        assert_eq!(targets(&net, 1), vec![Some(id(2))]);
    }

    #[test]
    fn reroute_replaces_all_targets() {
        let mut net = base();
        let script = EditScript {
            reroute_flowlines: BTreeMap::from([(id(1), 3), (id(2), 0)]),
            ..EditScript::default()
        };
        apply_edits(&mut net, &script).unwrap();
        assert_eq!(targets(&net, 1), vec![Some(id(3))]);
        assert_eq!(targets(&net, 2), vec![None]);
    }

    #[test]
    fn reroute_of_unknown_flowline_fails() {
        let mut net = base();
        let script = EditScript {
            reroute_flowlines: BTreeMap::from([(id(8), 1)]),
            ..EditScript::default()
        };
        assert!(apply_edits(&mut net, &script).is_err());
    }

    #[test]
    fn script_parses_from_yaml() {
        let yaml = "\
add_flowlines:
  - id: 10
    length_km: 0.5
    nhd_arbolate_sum_km: 3.0
    to_ids: [1]
drop_flowlines: [3]
reroute_flowlines:
  2: 0
";
        let script: EditScript = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(script.add_flowlines[0].flowline.id, id(10));
        assert_eq!(script.add_flowlines[0].flowline.fcode, 46006);
        assert_eq!(script.drop_flowlines, vec![id(3)]);
        assert_eq!(script.reroute_flowlines.get(&id(2)), Some(&0));
    }
}
