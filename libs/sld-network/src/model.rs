//! Grid network model
//!
//! Networks are exchanged as camelCase JSON documents. Only the equipment a
//! single-line diagram needs is modelled: substations, voltage levels and,
//! inside each voltage level, busbar sections, feeders and couplings.

use serde::{Deserialize, Serialize};

fn default_index() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Root of a network document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub substations: Vec<Substation>,
}

impl Network {
    /// Find a voltage level by id across all substations
    pub fn voltage_level(&self, id: &str) -> Option<&VoltageLevel> {
        self.voltage_levels().find(|vl| vl.id == id)
    }

    /// All voltage levels in declaration order
    pub fn voltage_levels(&self) -> impl Iterator<Item = &VoltageLevel> {
        self.substations
            .iter()
            .flat_map(|substation| substation.voltage_levels.iter())
    }

    /// Substation holding the given voltage level
    pub fn substation_of(&self, voltage_level_id: &str) -> Option<&Substation> {
        self.substations.iter().find(|substation| {
            substation
                .voltage_levels
                .iter()
                .any(|vl| vl.id == voltage_level_id)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub voltage_levels: Vec<VoltageLevel>,
}

/// How the voltage level topology is described
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopologyKind {
    #[default]
    NodeBreaker,
    BusBreaker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltageLevel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Nominal voltage in kV
    pub nominal_v: f64,
    #[serde(default)]
    pub topology_kind: TopologyKind,
    #[serde(default)]
    pub busbar_sections: Vec<BusbarSection>,
    #[serde(default)]
    pub feeders: Vec<Feeder>,
    #[serde(default)]
    pub switches: Vec<Switch>,
}

impl VoltageLevel {
    /// Name when requested and present, id otherwise
    pub fn display_name(&self, use_name: bool) -> &str {
        display_name(&self.id, self.name.as_deref(), use_name)
    }

    pub fn busbar_section(&self, id: &str) -> Option<&BusbarSection> {
        self.busbar_sections.iter().find(|bbs| bbs.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusbarSection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Vertical rank of the busbar, 1-based
    #[serde(default = "default_index")]
    pub busbar_index: u32,
    /// Horizontal rank of the section along its busbar, 1-based
    #[serde(default = "default_index")]
    pub section_index: u32,
    /// Voltage magnitude in kV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<f64>,
    /// Voltage angle in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeederKind {
    Load,
    Generator,
    Line,
    TwoWindingsTransformer,
    ThreeWindingsTransformer,
    ShuntCompensator,
    Battery,
    DanglingLine,
}

impl FeederKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeederKind::Load => "LOAD",
            FeederKind::Generator => "GENERATOR",
            FeederKind::Line => "LINE",
            FeederKind::TwoWindingsTransformer => "TWO_WINDINGS_TRANSFORMER",
            FeederKind::ThreeWindingsTransformer => "THREE_WINDINGS_TRANSFORMER",
            FeederKind::ShuntCompensator => "SHUNT_COMPENSATOR",
            FeederKind::Battery => "BATTERY",
            FeederKind::DanglingLine => "DANGLING_LINE",
        }
    }
}

/// Side of the busbars a feeder is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feeder {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: FeederKind,
    /// Busbar section the feeder is connected to
    pub busbar_section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Active power in MW
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    /// Reactive power in MVar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    #[serde(default = "default_true")]
    pub connected: bool,
}

impl Feeder {
    pub fn display_name(&self, use_name: bool) -> &str {
        display_name(&self.id, self.name.as_deref(), use_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchKind {
    Breaker,
    Disconnector,
    LoadBreakSwitch,
}

impl SwitchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchKind::Breaker => "BREAKER",
            SwitchKind::Disconnector => "DISCONNECTOR",
            SwitchKind::LoadBreakSwitch => "LOAD_BREAK_SWITCH",
        }
    }
}

/// Coupling between two busbar sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: SwitchKind,
    #[serde(default)]
    pub open: bool,
    pub busbar_section1: String,
    pub busbar_section2: String,
}

impl Switch {
    pub fn display_name(&self, use_name: bool) -> &str {
        display_name(&self.id, self.name.as_deref(), use_name)
    }
}

impl BusbarSection {
    pub fn display_name(&self, use_name: bool) -> &str {
        display_name(&self.id, self.name.as_deref(), use_name)
    }
}

fn display_name<'a>(id: &'a str, name: Option<&'a str>, use_name: bool) -> &'a str {
    match name {
        Some(name) if use_name => name,
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_minimal_document() {
        let network: Network = serde_json::from_str(
            r#"{
                "id": "n",
                "substations": [{
                    "id": "S1",
                    "voltageLevels": [{
                        "id": "VL1",
                        "nominalV": 400.0,
                        "busbarSections": [{"id": "BBS1"}],
                        "feeders": [{"id": "L1", "kind": "LOAD", "busbarSection": "BBS1"}]
                    }]
                }]
            }"#,
        )
        .unwrap();

        let vl = network.voltage_level("VL1").unwrap();
        assert_eq!(vl.topology_kind, TopologyKind::NodeBreaker);
        assert_eq!(vl.busbar_sections[0].busbar_index, 1);
        assert_eq!(vl.busbar_sections[0].section_index, 1);
        assert!(vl.feeders[0].connected);
        assert!(vl.feeders[0].order.is_none());
        assert!(vl.switches.is_empty());
    }

    #[test]
    fn test_enum_wire_names() {
        let kind: FeederKind = serde_json::from_str("\"TWO_WINDINGS_TRANSFORMER\"").unwrap();
        assert_eq!(kind, FeederKind::TwoWindingsTransformer);
        assert_eq!(kind.as_str(), "TWO_WINDINGS_TRANSFORMER");

        let topology: TopologyKind = serde_json::from_str("\"BUS_BREAKER\"").unwrap();
        assert_eq!(topology, TopologyKind::BusBreaker);

        let switch: SwitchKind = serde_json::from_str("\"LOAD_BREAK_SWITCH\"").unwrap();
        assert_eq!(switch.as_str(), "LOAD_BREAK_SWITCH");
    }

    #[test]
    fn test_lookup_and_display_name() {
        let network = Network {
            id: "n".to_string(),
            name: None,
            substations: vec![Substation {
                id: "S1".to_string(),
                name: None,
                country: Some("FR".to_string()),
                voltage_levels: vec![VoltageLevel {
                    id: "VL1".to_string(),
                    name: Some("Main 400".to_string()),
                    nominal_v: 400.0,
                    topology_kind: TopologyKind::BusBreaker,
                    busbar_sections: vec![],
                    feeders: vec![],
                    switches: vec![],
                }],
            }],
        };

        let vl = network.voltage_level("VL1").unwrap();
        assert_eq!(vl.display_name(true), "Main 400");
        assert_eq!(vl.display_name(false), "VL1");
        assert_eq!(network.substation_of("VL1").unwrap().id, "S1");
        assert!(network.voltage_level("VLX").is_none());
        assert!(network.substation_of("VLX").is_none());
    }
}
