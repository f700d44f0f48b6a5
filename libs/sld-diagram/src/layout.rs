//! Voltage level layouts
//!
//! Busbars are horizontal lines stacked by `busbar_index`. Every feeder and
//! coupling gets one column (cell); feeders hang above or below the busbars.

use crate::graph::{NodeKind, VoltageLevelGraph};
use serde::{Deserialize, Serialize};
use sld_network::{Direction, FeederKind, Network};
use std::collections::HashMap;

/// Geometry settings shared by layouts and the SVG writer
///
/// Field names stay snake_case so every key can be set from YAML or a
/// `__`-separated environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParameters {
    pub translate_x: f64,
    pub translate_y: f64,
    pub initial_x_bus: f64,
    pub initial_y_bus: f64,
    pub vertical_space_bus: f64,
    pub horizontal_bus_padding: f64,
    pub cell_width: f64,
    pub extern_cell_height: f64,
    pub intern_cell_height: f64,
    pub stack_height: f64,
    pub show_grid: bool,
    pub show_internal_nodes: bool,
    pub scale_factor: f64,
    pub arrow_distance: f64,
    pub label_font_size: u32,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            translate_x: 20.0,
            translate_y: 50.0,
            initial_x_bus: 0.0,
            initial_y_bus: 260.0,
            vertical_space_bus: 25.0,
            horizontal_bus_padding: 20.0,
            cell_width: 50.0,
            extern_cell_height: 250.0,
            intern_cell_height: 40.0,
            stack_height: 30.0,
            show_grid: false,
            show_internal_nodes: false,
            scale_factor: 1.0,
            arrow_distance: 20.0,
            label_font_size: 11,
        }
    }
}

/// Position of a node before translation and scaling
///
/// Busbars are anchored at their left end and carry a length; every other
/// node is anchored at its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
    pub length: Option<f64>,
    pub direction: Option<Direction>,
}

/// Result of a layout run, indexed like [`VoltageLevelGraph::nodes`]
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    pub positions: Vec<NodePosition>,
    pub width: f64,
    pub height: f64,
}

pub trait VoltageLevelLayout {
    fn run(&self, graph: &VoltageLevelGraph, params: &LayoutParameters) -> DiagramLayout;
}

pub trait VoltageLevelLayoutFactory: Send + Sync {
    fn create(&self, graph: &VoltageLevelGraph) -> Box<dyn VoltageLevelLayout>;
}

/// Columns follow the feeders' explicit `order`
pub struct PositionVoltageLevelLayout;

/// Columns follow declaration order
pub struct ImplicitVoltageLevelLayout;

impl VoltageLevelLayout for PositionVoltageLevelLayout {
    fn run(&self, graph: &VoltageLevelGraph, params: &LayoutParameters) -> DiagramLayout {
        let mut feeders: Vec<(usize, i32)> = graph
            .feeders()
            .map(|(index, node)| match &node.kind {
                NodeKind::Feeder { order, .. } => (index, order.unwrap_or(i32::MAX)),
                _ => (index, i32::MAX),
            })
            .collect();
        // Stable sort keeps declaration order between equal orders
        feeders.sort_by_key(|(_, order)| *order);

        let cells = feeders.into_iter().map(|(index, _)| index).collect();
        place(graph, params, cells)
    }
}

impl VoltageLevelLayout for ImplicitVoltageLevelLayout {
    fn run(&self, graph: &VoltageLevelGraph, params: &LayoutParameters) -> DiagramLayout {
        let cells = graph.feeders().map(|(index, _)| index).collect();
        place(graph, params, cells)
    }
}

/// Picks the position layout when every feeder of the voltage level has an
/// order, the implicit one otherwise
pub struct SmartVoltageLevelLayoutFactory<'a> {
    network: &'a Network,
}

impl<'a> SmartVoltageLevelLayoutFactory<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }

    fn has_full_order(&self, voltage_level_id: &str) -> bool {
        self.network
            .voltage_level(voltage_level_id)
            .is_some_and(|vl| vl.feeders.iter().all(|feeder| feeder.order.is_some()))
    }
}

impl VoltageLevelLayoutFactory for SmartVoltageLevelLayoutFactory<'_> {
    fn create(&self, graph: &VoltageLevelGraph) -> Box<dyn VoltageLevelLayout> {
        if self.has_full_order(&graph.voltage_level_id) {
            Box::new(PositionVoltageLevelLayout)
        } else {
            Box::new(ImplicitVoltageLevelLayout)
        }
    }
}

fn default_direction(kind: FeederKind) -> Direction {
    match kind {
        FeederKind::Load | FeederKind::ShuntCompensator | FeederKind::Battery => Direction::Bottom,
        _ => Direction::Top,
    }
}

fn place(graph: &VoltageLevelGraph, params: &LayoutParameters, feeder_cells: Vec<usize>) -> DiagramLayout {
    let mut cells = feeder_cells;
    cells.extend(graph.switches().map(|(index, _)| index));
    let cell_count = cells.len().max(1) as f64;

    let bus_span = 2.0 * params.horizontal_bus_padding + cell_count * params.cell_width;

    let mut sections_per_bus: HashMap<u32, u32> = HashMap::new();
    let mut max_busbar_index = 1;
    for (_, node) in graph.busbars() {
        if let NodeKind::Busbar {
            busbar_index,
            section_index,
        } = node.kind
        {
            let sections = sections_per_bus.entry(busbar_index).or_insert(1);
            *sections = (*sections).max(section_index);
            max_busbar_index = max_busbar_index.max(busbar_index);
        }
    }

    let bus_y = |busbar_index: u32| {
        params.initial_y_bus + f64::from(busbar_index.saturating_sub(1)) * params.vertical_space_bus
    };
    let bottom_bus_y = bus_y(max_busbar_index);
    let cell_x = |cell: usize| {
        params.initial_x_bus
            + params.horizontal_bus_padding
            + cell as f64 * params.cell_width
            + params.cell_width / 2.0
    };

    let mut positions = vec![
        NodePosition {
            x: 0.0,
            y: 0.0,
            length: None,
            direction: None,
        };
        graph.nodes.len()
    ];

    for (index, node) in graph.busbars() {
        if let NodeKind::Busbar {
            busbar_index,
            section_index,
        } = node.kind
        {
            let sections = sections_per_bus.get(&busbar_index).copied().unwrap_or(1);
            let length = bus_span / f64::from(sections);
            positions[index] = NodePosition {
                x: params.initial_x_bus + f64::from(section_index.saturating_sub(1)) * length,
                y: bus_y(busbar_index),
                length: Some(length),
                direction: None,
            };
        }
    }

    let busbar_y_of = |id: &str| match graph.node(id).map(|node| &node.kind) {
        Some(NodeKind::Busbar { busbar_index, .. }) => bus_y(*busbar_index),
        _ => params.initial_y_bus,
    };

    for (cell, &index) in cells.iter().enumerate() {
        let x = cell_x(cell);
        let position = match &graph.nodes[index].kind {
            NodeKind::Feeder {
                feeder_kind,
                direction,
                ..
            } => {
                let direction = direction.unwrap_or_else(|| default_direction(*feeder_kind));
                let y = match direction {
                    Direction::Top => params.initial_y_bus - params.extern_cell_height,
                    Direction::Bottom => bottom_bus_y + params.extern_cell_height,
                };
                NodePosition {
                    x,
                    y,
                    length: None,
                    direction: Some(direction),
                }
            },
            _ => {
                let (y1, y2) = coupled_busbars_y(graph, index, &busbar_y_of);
                let y = if (y1 - y2).abs() > f64::EPSILON {
                    (y1 + y2) / 2.0
                } else {
                    y1 - params.intern_cell_height
                };
                NodePosition {
                    x,
                    y,
                    length: None,
                    direction: None,
                }
            },
        };
        positions[index] = position;
    }

    // Inductors sit halfway between their feeder and the busbar
    for (index, node) in graph.nodes.iter().enumerate() {
        if let NodeKind::Inductor { feeder } = &node.kind {
            if let Some(feeder_index) = graph.node_index(feeder) {
                let feeder_position = positions[feeder_index];
                let bus = match &graph.nodes[feeder_index].kind {
                    NodeKind::Feeder { busbar_section, .. } => busbar_y_of(busbar_section),
                    _ => params.initial_y_bus,
                };
                positions[index] = NodePosition {
                    x: feeder_position.x,
                    y: (feeder_position.y + bus) / 2.0,
                    length: None,
                    direction: feeder_position.direction,
                };
            }
        }
    }

    DiagramLayout {
        positions,
        width: params.initial_x_bus + bus_span,
        height: bottom_bus_y + params.extern_cell_height + params.stack_height,
    }
}

/// Y of the two busbars a coupling connects, from its edges
fn coupled_busbars_y(
    graph: &VoltageLevelGraph,
    switch: usize,
    busbar_y_of: &dyn Fn(&str) -> f64,
) -> (f64, f64) {
    let mut ys = graph.edges.iter().filter_map(|edge| {
        let other = if edge.node1 == switch {
            edge.node2
        } else if edge.node2 == switch {
            edge.node1
        } else {
            return None;
        };
        let node = &graph.nodes[other];
        node.is_busbar().then(|| busbar_y_of(&node.id))
    });
    let y1 = ys.next().unwrap_or(0.0);
    let y2 = ys.next().unwrap_or(y1);
    (y1, y2)
}
