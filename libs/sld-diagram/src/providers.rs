//! Pluggable providers consulted while rendering
//!
//! - initial values: power flow labels and arrows drawn next to feeders,
//!   voltage readings under busbars
//! - style: CSS classes per node and wire
//! - labels: text and placement of node labels

use crate::graph::{ComponentType, Edge, Node, NodeKind, VoltageLevelGraph};
use crate::library::ComponentLibrary;
use serde::Serialize;
use sld_network::{Direction, Network};

// ============================================================================
// Initial values
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArrowDirection {
    /// Power flows from the busbar into the feeder
    Out,
    /// Power flows from the feeder into the busbar
    In,
}

/// One value drawn next to a feeder
#[derive(Debug, Clone, PartialEq)]
pub struct FeederInfo {
    pub component_type: ComponentType,
    pub label: String,
    pub direction: Option<ArrowDirection>,
}

pub trait DiagramInitialValueProvider {
    /// Values drawn next to `node`, empty for non-feeders
    fn feeder_infos(&self, graph: &VoltageLevelGraph, node: &Node) -> Vec<FeederInfo>;

    /// Voltage reading drawn under a busbar section
    fn busbar_voltage(&self, _graph: &VoltageLevelGraph, _node: &Node) -> Option<String> {
        None
    }
}

/// Active and reactive power of each connected feeder, read from the network
pub struct DefaultDiagramInitialValueProvider<'a> {
    network: &'a Network,
}

impl<'a> DefaultDiagramInitialValueProvider<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }
}

fn power_info(component_type: ComponentType, value: Option<f64>) -> FeederInfo {
    match value {
        Some(value) if value.is_finite() => FeederInfo {
            component_type,
            // +0.0 avoids printing "-0" for small negative flows
            label: format!("{}", value.round() + 0.0),
            direction: if value > 0.0 {
                Some(ArrowDirection::Out)
            } else if value < 0.0 {
                Some(ArrowDirection::In)
            } else {
                None
            },
        },
        _ => FeederInfo {
            component_type,
            label: String::new(),
            direction: None,
        },
    }
}

impl DiagramInitialValueProvider for DefaultDiagramInitialValueProvider<'_> {
    fn feeder_infos(&self, graph: &VoltageLevelGraph, node: &Node) -> Vec<FeederInfo> {
        if !node.is_feeder() || node.is_disconnected() {
            return Vec::new();
        }
        let Some(feeder) = self
            .network
            .voltage_level(&graph.voltage_level_id)
            .and_then(|vl| vl.feeders.iter().find(|f| f.id == node.equipment_id))
        else {
            return Vec::new();
        };

        vec![
            power_info(ComponentType::ArrowActive, feeder.p),
            power_info(ComponentType::ArrowReactive, feeder.q),
        ]
    }

    /// `"401.2 kV"`, followed by `" / -1.5°"` when the angle is known
    fn busbar_voltage(&self, graph: &VoltageLevelGraph, node: &Node) -> Option<String> {
        if !node.is_busbar() {
            return None;
        }
        let section = self
            .network
            .voltage_level(&graph.voltage_level_id)?
            .busbar_sections
            .iter()
            .find(|section| section.id == node.equipment_id)?;
        let v = section.v.filter(|v| v.is_finite())?;

        let mut text = format!("{:.1} kV", v + 0.0);
        if let Some(angle) = section.angle.filter(|angle| angle.is_finite()) {
            text.push_str(&format!(" / {:.1}°", angle + 0.0));
        }
        Some(text)
    }
}

// ============================================================================
// Style
// ============================================================================

pub trait DiagramStyleProvider {
    fn node_styles(&self, graph: &VoltageLevelGraph, node: &Node) -> Vec<String>;

    fn wire_styles(&self, graph: &VoltageLevelGraph, edge: &Edge) -> Vec<String>;

    /// Extra CSS appended after the component library style sheet
    fn css(&self) -> String;
}

/// Colors equipment by nominal voltage band
#[derive(Debug, Clone, Copy, Default)]
pub struct NominalVoltageDiagramStyleProvider;

const VOLTAGE_BANDS: [(f64, &str, &str); 7] = [
    (300.0, "sld-vl300to500", "#ff0000"),
    (180.0, "sld-vl180to300", "#228b22"),
    (120.0, "sld-vl120to180", "#01a8a8"),
    (70.0, "sld-vl70to120", "#ff8c00"),
    (50.0, "sld-vl50to70", "#a020f0"),
    (30.0, "sld-vl30to50", "#ff69b4"),
    (0.0, "sld-vl0to30", "#8b4513"),
];

impl NominalVoltageDiagramStyleProvider {
    pub fn voltage_class(nominal_v: f64) -> &'static str {
        VOLTAGE_BANDS
            .iter()
            .find(|(lower, _, _)| nominal_v >= *lower)
            .map(|(_, class, _)| *class)
            .unwrap_or("sld-vl0to30")
    }
}

impl DiagramStyleProvider for NominalVoltageDiagramStyleProvider {
    fn node_styles(&self, graph: &VoltageLevelGraph, node: &Node) -> Vec<String> {
        let mut styles = vec![Self::voltage_class(graph.nominal_v).to_string()];
        if node.is_open() {
            styles.push("sld-open".to_string());
        }
        if node.is_disconnected() {
            styles.push("sld-disconnected".to_string());
        }
        styles
    }

    fn wire_styles(&self, graph: &VoltageLevelGraph, edge: &Edge) -> Vec<String> {
        let mut styles = vec![
            "sld-wire".to_string(),
            Self::voltage_class(graph.nominal_v).to_string(),
        ];
        let disconnected = [edge.node1, edge.node2]
            .iter()
            .filter_map(|&index| graph.nodes.get(index))
            .any(Node::is_disconnected);
        if disconnected {
            styles.push("sld-disconnected".to_string());
        }
        styles
    }

    fn css(&self) -> String {
        VOLTAGE_BANDS
            .iter()
            .map(|(_, class, color)| format!(".{} {{stroke: {}; color: {}}}\n", class, color, color))
            .collect()
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Label text with its offset from the node anchor
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLabel {
    /// Key of the label within its node, appended to the node's SVG id
    pub id: String,
    pub text: String,
    pub dx: f64,
    pub dy: f64,
}

pub trait NodeLabelConfiguration {
    fn node_labels(&self, node: &Node, direction: Option<Direction>) -> Vec<NodeLabel>;
}

/// Labels busbars at their left end, feeders beyond their symbol and
/// couplings on their right
pub struct DefaultNodeLabelConfiguration<'a> {
    library: &'a dyn ComponentLibrary,
}

impl<'a> DefaultNodeLabelConfiguration<'a> {
    const LABEL_GAP: f64 = 5.0;

    pub fn new(library: &'a dyn ComponentLibrary) -> Self {
        Self { library }
    }
}

impl NodeLabelConfiguration for DefaultNodeLabelConfiguration<'_> {
    fn node_labels(&self, node: &Node, direction: Option<Direction>) -> Vec<NodeLabel> {
        if node.name.is_empty() {
            return Vec::new();
        }
        let size = self.library.size(node.component_type);
        let (dx, dy) = match &node.kind {
            NodeKind::Busbar { .. } => (0.0, -Self::LABEL_GAP),
            NodeKind::Feeder { .. } => match direction {
                Some(Direction::Bottom) => (0.0, size.height / 2.0 + 2.0 * Self::LABEL_GAP),
                _ => (0.0, -(size.height / 2.0 + Self::LABEL_GAP)),
            },
            NodeKind::Switch { .. } | NodeKind::Inductor { .. } => {
                (size.width / 2.0 + Self::LABEL_GAP, 0.0)
            },
        };

        vec![NodeLabel {
            id: "LABEL".to_string(),
            text: node.name.clone(),
            dx,
            dy,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NetworkGraphBuilder};
    use crate::library::ResourcesComponentLibrary;
    use sld_network::fixtures::sample_network;

    fn graph(network: &Network, vl: &str) -> VoltageLevelGraph {
        NetworkGraphBuilder::new(network)
            .build_voltage_level_graph(vl, true, false)
            .unwrap()
    }

    #[test]
    fn test_voltage_bands() {
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(400.0), "sld-vl300to500");
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(225.0), "sld-vl180to300");
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(150.0), "sld-vl120to180");
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(90.0), "sld-vl70to120");
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(63.0), "sld-vl50to70");
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(45.0), "sld-vl30to50");
        assert_eq!(NominalVoltageDiagramStyleProvider::voltage_class(20.0), "sld-vl0to30");
    }

    #[test]
    fn test_open_and_disconnected_styles() {
        let mut network = sample_network();
        network.substations[0].voltage_levels[0].switches[0].open = true;
        let style = NominalVoltageDiagramStyleProvider;

        let vl1 = graph(&network, "VL1");
        let coupler = vl1.node("COUPLER1").unwrap();
        assert_eq!(style.node_styles(&vl1, coupler), vec!["sld-vl300to500", "sld-open"]);

        let vl2 = graph(&network, "VL2");
        let shunt = vl2.node_index("SHUNT1").unwrap();
        assert!(style
            .node_styles(&vl2, &vl2.nodes[shunt])
            .contains(&"sld-disconnected".to_string()));
        let wire = vl2.edges.iter().find(|e| e.node2 == shunt).unwrap();
        assert!(style.wire_styles(&vl2, wire).contains(&"sld-disconnected".to_string()));
    }

    #[test]
    fn test_feeder_power_values() {
        let network = sample_network();
        let provider = DefaultDiagramInitialValueProvider::new(&network);
        let vl1 = graph(&network, "VL1");

        let infos = provider.feeder_infos(&vl1, vl1.node("GEN1").unwrap());
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].component_type, ComponentType::ArrowActive);
        assert_eq!(infos[0].label, "-120");
        assert_eq!(infos[0].direction, Some(ArrowDirection::In));
        assert_eq!(infos[1].label, "-30");

        let load = provider.feeder_infos(&vl1, vl1.node("LOAD1").unwrap());
        assert_eq!(load[1].label, "13");
        assert_eq!(load[0].direction, Some(ArrowDirection::Out));

        assert!(provider.feeder_infos(&vl1, vl1.node("BBS1").unwrap()).is_empty());

        let vl2 = graph(&network, "VL2");
        assert!(provider.feeder_infos(&vl2, vl2.node("SHUNT1").unwrap()).is_empty());
    }

    #[test]
    fn test_busbar_voltage_readings() {
        let mut network = sample_network();
        network.substations[0].voltage_levels[0].busbar_sections[1].angle = Some(-1.54);
        let provider = DefaultDiagramInitialValueProvider::new(&network);
        let vl1 = graph(&network, "VL1");

        assert_eq!(
            provider.busbar_voltage(&vl1, vl1.node("BBS1").unwrap()).as_deref(),
            Some("401.2 kV / 0.0°")
        );
        assert_eq!(
            provider.busbar_voltage(&vl1, vl1.node("BBS2").unwrap()).as_deref(),
            Some("400.8 kV / -1.5°")
        );
        assert_eq!(provider.busbar_voltage(&vl1, vl1.node("GEN1").unwrap()), None);

        network.substations[0].voltage_levels[0].busbar_sections[0].angle = None;
        network.substations[0].voltage_levels[0].busbar_sections[1].v = None;
        let provider = DefaultDiagramInitialValueProvider::new(&network);
        assert_eq!(
            provider.busbar_voltage(&vl1, vl1.node("BBS1").unwrap()).as_deref(),
            Some("401.2 kV")
        );
        assert_eq!(provider.busbar_voltage(&vl1, vl1.node("BBS2").unwrap()), None);
    }

    #[test]
    fn test_label_placement_follows_direction() {
        let network = sample_network();
        let library = ResourcesComponentLibrary::convergence();
        let labels = DefaultNodeLabelConfiguration::new(&library);
        let vl1 = graph(&network, "VL1");

        let top = labels.node_labels(vl1.node("GEN1").unwrap(), Some(Direction::Top));
        assert_eq!(top[0].text, "Generator 1");
        assert_eq!(top[0].id, "LABEL");
        assert!(top[0].dy < 0.0);

        let bottom = labels.node_labels(vl1.node("LOAD1").unwrap(), Some(Direction::Bottom));
        assert!(bottom[0].dy > 0.0);
    }
}
