//! Voltage level graph
//!
//! Nodes are busbar sections, feeders and coupling switches. Every feeder is
//! wired to its busbar section, every coupling to both of its sections.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use sld_network::{Direction, FeederKind, Network, SwitchKind};
use std::collections::HashSet;
use tracing::debug;

/// Symbol family a node is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    BusbarSection,
    Breaker,
    Disconnector,
    LoadBreakSwitch,
    Load,
    Generator,
    Line,
    TwoWindingsTransformer,
    ThreeWindingsTransformer,
    Inductor,
    Capacitor,
    Battery,
    DanglingLine,
    ArrowActive,
    ArrowReactive,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::BusbarSection => "BUSBAR_SECTION",
            ComponentType::Breaker => "BREAKER",
            ComponentType::Disconnector => "DISCONNECTOR",
            ComponentType::LoadBreakSwitch => "LOAD_BREAK_SWITCH",
            ComponentType::Load => "LOAD",
            ComponentType::Generator => "GENERATOR",
            ComponentType::Line => "LINE",
            ComponentType::TwoWindingsTransformer => "TWO_WINDINGS_TRANSFORMER",
            ComponentType::ThreeWindingsTransformer => "THREE_WINDINGS_TRANSFORMER",
            ComponentType::Inductor => "INDUCTOR",
            ComponentType::Capacitor => "CAPACITOR",
            ComponentType::Battery => "BATTERY",
            ComponentType::DanglingLine => "DANGLING_LINE",
            ComponentType::ArrowActive => "ARROW_ACTIVE",
            ComponentType::ArrowReactive => "ARROW_REACTIVE",
        }
    }
}

impl From<FeederKind> for ComponentType {
    fn from(kind: FeederKind) -> Self {
        match kind {
            FeederKind::Load => ComponentType::Load,
            FeederKind::Generator => ComponentType::Generator,
            FeederKind::Line => ComponentType::Line,
            FeederKind::TwoWindingsTransformer => ComponentType::TwoWindingsTransformer,
            FeederKind::ThreeWindingsTransformer => ComponentType::ThreeWindingsTransformer,
            FeederKind::ShuntCompensator => ComponentType::Capacitor,
            FeederKind::Battery => ComponentType::Battery,
            FeederKind::DanglingLine => ComponentType::DanglingLine,
        }
    }
}

impl From<SwitchKind> for ComponentType {
    fn from(kind: SwitchKind) -> Self {
        match kind {
            SwitchKind::Breaker => ComponentType::Breaker,
            SwitchKind::Disconnector => ComponentType::Disconnector,
            SwitchKind::LoadBreakSwitch => ComponentType::LoadBreakSwitch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Busbar {
        busbar_index: u32,
        section_index: u32,
    },
    Feeder {
        feeder_kind: FeederKind,
        busbar_section: String,
        order: Option<i32>,
        direction: Option<Direction>,
        connected: bool,
    },
    Switch {
        open: bool,
    },
    /// Inductor drawn between a three-windings transformer and its busbar
    Inductor {
        feeder: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub equipment_id: String,
    /// Name or id, depending on the `use_name` flag given to the builder
    pub name: String,
    pub component_type: ComponentType,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_busbar(&self) -> bool {
        matches!(self.kind, NodeKind::Busbar { .. })
    }

    pub fn is_feeder(&self) -> bool {
        matches!(self.kind, NodeKind::Feeder { .. })
    }

    pub fn is_open(&self) -> bool {
        matches!(self.kind, NodeKind::Switch { open: true })
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Feeder {
                connected: false,
                ..
            }
        )
    }
}

/// Wire between two nodes, by index into [`VoltageLevelGraph::nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub node1: usize,
    pub node2: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoltageLevelGraph {
    pub voltage_level_id: String,
    pub voltage_level_name: String,
    pub nominal_v: f64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl VoltageLevelGraph {
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn busbars(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_busbar())
    }

    pub fn feeders(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_feeder())
    }

    pub fn switches(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Switch { .. }))
    }
}

/// Builds the graph of one voltage level
pub trait GraphBuilder {
    fn build_voltage_level_graph(
        &self,
        voltage_level_id: &str,
        use_name: bool,
        show_inductor_for_3wt: bool,
    ) -> Result<VoltageLevelGraph, GraphError>;
}

/// Graph builder reading directly from a [`Network`]
pub struct NetworkGraphBuilder<'a> {
    network: &'a Network,
}

impl<'a> NetworkGraphBuilder<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }
}

struct GraphAssembly {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: HashSet<String>,
}

impl GraphAssembly {
    fn add(&mut self, node: Node) -> Result<usize, GraphError> {
        if !self.ids.insert(node.id.clone()) {
            return Err(GraphError::DuplicateId(node.id));
        }
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    fn connect(&mut self, node1: usize, node2: usize) {
        self.edges.push(Edge { node1, node2 });
    }

    fn busbar(&self, equipment: &str, busbar_section: &str) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|node| node.is_busbar() && node.id == busbar_section)
            .ok_or_else(|| GraphError::UnknownBusbarSection {
                equipment: equipment.to_string(),
                busbar_section: busbar_section.to_string(),
            })
    }
}

impl GraphBuilder for NetworkGraphBuilder<'_> {
    fn build_voltage_level_graph(
        &self,
        voltage_level_id: &str,
        use_name: bool,
        show_inductor_for_3wt: bool,
    ) -> Result<VoltageLevelGraph, GraphError> {
        let vl = self
            .network
            .voltage_level(voltage_level_id)
            .ok_or_else(|| GraphError::VoltageLevelNotFound(voltage_level_id.to_string()))?;

        let mut graph = GraphAssembly {
            nodes: Vec::new(),
            edges: Vec::new(),
            ids: HashSet::new(),
        };

        for bbs in &vl.busbar_sections {
            graph.add(Node {
                id: bbs.id.clone(),
                equipment_id: bbs.id.clone(),
                name: bbs.display_name(use_name).to_string(),
                component_type: ComponentType::BusbarSection,
                kind: NodeKind::Busbar {
                    busbar_index: bbs.busbar_index,
                    section_index: bbs.section_index,
                },
            })?;
        }

        for feeder in &vl.feeders {
            let bus = graph.busbar(&feeder.id, &feeder.busbar_section)?;
            let node = graph.add(Node {
                id: feeder.id.clone(),
                equipment_id: feeder.id.clone(),
                name: feeder.display_name(use_name).to_string(),
                component_type: feeder.kind.into(),
                kind: NodeKind::Feeder {
                    feeder_kind: feeder.kind,
                    busbar_section: feeder.busbar_section.clone(),
                    order: feeder.order,
                    direction: feeder.direction,
                    connected: feeder.connected,
                },
            })?;

            if show_inductor_for_3wt && feeder.kind == FeederKind::ThreeWindingsTransformer {
                let inductor = graph.add(Node {
                    id: format!("{}_INDUCTOR", feeder.id),
                    equipment_id: feeder.id.clone(),
                    name: String::new(),
                    component_type: ComponentType::Inductor,
                    kind: NodeKind::Inductor {
                        feeder: feeder.id.clone(),
                    },
                })?;
                graph.connect(bus, inductor);
                graph.connect(inductor, node);
            } else {
                graph.connect(bus, node);
            }
        }

        for switch in &vl.switches {
            let bus1 = graph.busbar(&switch.id, &switch.busbar_section1)?;
            let bus2 = graph.busbar(&switch.id, &switch.busbar_section2)?;
            let node = graph.add(Node {
                id: switch.id.clone(),
                equipment_id: switch.id.clone(),
                name: switch.display_name(use_name).to_string(),
                component_type: switch.kind.into(),
                kind: NodeKind::Switch { open: switch.open },
            })?;
            graph.connect(bus1, node);
            graph.connect(node, bus2);
        }

        debug!(
            "Graph of {}: {} nodes, {} edges",
            vl.id,
            graph.nodes.len(),
            graph.edges.len()
        );

        Ok(VoltageLevelGraph {
            voltage_level_id: vl.id.clone(),
            voltage_level_name: vl.display_name(use_name).to_string(),
            nominal_v: vl.nominal_v,
            nodes: graph.nodes,
            edges: graph.edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_network::fixtures::sample_network;

    #[test]
    fn test_build_sample_graph() {
        let network = sample_network();
        let graph = NetworkGraphBuilder::new(&network)
            .build_voltage_level_graph("VL1", false, false)
            .unwrap();

        assert_eq!(graph.voltage_level_name, "VL1");
        assert_eq!(graph.busbars().count(), 2);
        assert_eq!(graph.feeders().count(), 3);
        assert_eq!(graph.switches().count(), 1);
        // 3 feeder wires + 2 coupling wires
        assert_eq!(graph.edges.len(), 5);

        let line = graph.node("LINE1").unwrap();
        assert_eq!(line.component_type, ComponentType::Line);
        assert_eq!(line.name, "LINE1");
    }

    #[test]
    fn test_use_name_resolves_labels() {
        let network = sample_network();
        let graph = NetworkGraphBuilder::new(&network)
            .build_voltage_level_graph("VL1", true, false)
            .unwrap();
        assert_eq!(graph.voltage_level_name, "Voltage level 1");
        assert_eq!(graph.node("LOAD1").unwrap().name, "Load 1");
    }

    #[test]
    fn test_unknown_voltage_level() {
        let network = sample_network();
        let err = NetworkGraphBuilder::new(&network)
            .build_voltage_level_graph("VLX", false, false)
            .unwrap_err();
        assert_eq!(err, GraphError::VoltageLevelNotFound("VLX".to_string()));
    }

    #[test]
    fn test_dangling_busbar_reference() {
        let mut network = sample_network();
        network.substations[0].voltage_levels[0].feeders[0].busbar_section = "BBS9".to_string();

        let err = NetworkGraphBuilder::new(&network)
            .build_voltage_level_graph("VL1", false, false)
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownBusbarSection { busbar_section, .. } if busbar_section == "BBS9"));
    }

    #[test]
    fn test_inductor_only_when_requested() {
        let mut network = sample_network();
        network.substations[0].voltage_levels[1].feeders[0].kind =
            FeederKind::ThreeWindingsTransformer;
        let builder = NetworkGraphBuilder::new(&network);

        let plain = builder.build_voltage_level_graph("VL2", false, false).unwrap();
        assert!(plain.node("TR1_INDUCTOR").is_none());

        let with_inductor = builder.build_voltage_level_graph("VL2", false, true).unwrap();
        let inductor = with_inductor.node_index("TR1_INDUCTOR").unwrap();
        assert_eq!(with_inductor.edges.len(), plain.edges.len() + 1);
        assert!(with_inductor.edges.iter().any(|e| e.node1 == inductor));
    }
}
