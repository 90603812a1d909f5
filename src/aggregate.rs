use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{deserialize_u32_from_number, MaterialSignature, PieceRequest, Rect};

fn default_true() -> bool {
    true
}

fn default_qty() -> u32 {
    1
}

/// One panel line as authored in a unit: finished size, material and how
/// many copies are wanted. `grain_lock` overrides the material default for
/// odd panels such as drawer bottoms cut cross-grain on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSpec {
    pub name: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub size: Rect,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub thickness: u32,
    pub color: String,
    #[serde(default = "default_true")]
    pub grained: bool,
    #[serde(default)]
    pub grain_lock: Option<bool>,
    #[serde(
        default = "default_qty",
        deserialize_with = "deserialize_u32_from_number"
    )]
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(default)]
    pub project: u32,
    #[serde(default)]
    pub unit: u32,
    pub panels: Vec<PanelSpec>,
}

/// Expands panel quantities into individual piece requests and groups them
/// by material signature. Iteration order inside each group follows the
/// authored order; the map itself iterates in signature order.
pub fn aggregate(units: &[SourceUnit]) -> BTreeMap<MaterialSignature, Vec<PieceRequest>> {
    let mut groups: BTreeMap<MaterialSignature, Vec<PieceRequest>> = BTreeMap::new();

    for unit in units {
        for (seq, panel) in unit.panels.iter().enumerate() {
            if panel.qty == 0 {
                continue;
            }
            let signature = MaterialSignature {
                thickness: panel.thickness,
                color: panel.color.clone(),
                grained: panel.grained,
            };
            let base_ref = panel
                .reference
                .clone()
                .unwrap_or_else(|| format!("P{}/U{}/N{:02}", unit.project, unit.unit, seq + 1));
            let grain_locked = panel.grain_lock.unwrap_or(panel.grained);

            for copy in 1..=panel.qty {
                let reference = if panel.qty > 1 {
                    format!("{base_ref}-{copy}")
                } else {
                    base_ref.clone()
                };
                groups.entry(signature.clone()).or_default().push(PieceRequest {
                    name: panel.name.clone(),
                    reference,
                    size: panel.size,
                    signature: signature.clone(),
                    grain_locked,
                });
            }
        }
    }

    groups
}
