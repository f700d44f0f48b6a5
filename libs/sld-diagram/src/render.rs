//! SVG and metadata rendering
//!
//! [`DefaultSvgWriter`] builds the graph, runs the layout chosen by the
//! layout factory, and writes two documents: the SVG drawing and a JSON
//! metadata document describing the same nodes, wires and feeder values.
//! Output depends only on its inputs.

use crate::error::RenderError;
use crate::graph::{ComponentType, GraphBuilder, Node, NodeKind, VoltageLevelGraph};
use crate::layout::{DiagramLayout, LayoutParameters, NodePosition, VoltageLevelLayoutFactory};
use crate::library::{ComponentLibrary, ComponentSize};
use crate::providers::{
    ArrowDirection, DiagramInitialValueProvider, DiagramStyleProvider, NodeLabelConfiguration,
};
use serde::Serialize;
use sld_network::Direction;
use std::io::{self, Write};
use tracing::debug;

/// Everything a renderer needs besides the graph source
pub struct RenderConfig<'a> {
    pub use_name: bool,
    pub show_inductor_for_3wt: bool,
    pub layout_factory: &'a dyn VoltageLevelLayoutFactory,
    pub component_library: &'a dyn ComponentLibrary,
    pub layout_parameters: &'a LayoutParameters,
    pub initial_values: &'a dyn DiagramInitialValueProvider,
    pub style: &'a dyn DiagramStyleProvider,
    pub labels: &'a dyn NodeLabelConfiguration,
}

pub trait DiagramRenderer: Send + Sync {
    /// Render one voltage level into the two writers
    fn render(
        &self,
        graph_builder: &dyn GraphBuilder,
        voltage_level_id: &str,
        config: &RenderConfig<'_>,
        svg: &mut dyn Write,
        metadata: &mut dyn Write,
    ) -> Result<(), RenderError>;
}

// ============================================================================
// Metadata document
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMetadata {
    pub nodes: Vec<NodeMetadata>,
    pub wires: Vec<WireMetadata>,
    pub feeder_infos: Vec<FeederInfoMetadata>,
    pub components: Vec<ComponentMetadata>,
    pub layout_parameters: LayoutParametersMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub id: String,
    pub v_id: String,
    pub equipment_id: String,
    pub component_type: ComponentType,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Busbar voltage reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMetadata {
    pub id: String,
    pub node_id1: String,
    pub node_id2: String,
    pub straight: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeederInfoMetadata {
    pub id: String,
    pub equipment_id: String,
    pub component_type: ComponentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<ArrowDirection>,
    pub label: String,
}

/// Layout parameters echoed in the metadata document
///
/// Configuration reads [`LayoutParameters`] in snake_case; the document
/// keeps the camelCase names diagram clients expect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParametersMetadata {
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

impl From<&LayoutParameters> for LayoutParametersMetadata {
    fn from(params: &LayoutParameters) -> Self {
        Self {
            translate_x: params.translate_x,
            translate_y: params.translate_y,
            initial_x_bus: params.initial_x_bus,
            initial_y_bus: params.initial_y_bus,
            vertical_space_bus: params.vertical_space_bus,
            horizontal_bus_padding: params.horizontal_bus_padding,
            cell_width: params.cell_width,
            extern_cell_height: params.extern_cell_height,
            intern_cell_height: params.intern_cell_height,
            stack_height: params.stack_height,
            show_grid: params.show_grid,
            show_internal_nodes: params.show_internal_nodes,
            scale_factor: params.scale_factor,
            arrow_distance: params.arrow_distance,
            label_font_size: params.label_font_size,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub size: ComponentSize,
    pub style_class: String,
}

// ============================================================================
// SVG writer
// ============================================================================

/// Default SVG + JSON metadata writer
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSvgWriter;

impl DefaultSvgWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Escape text for XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// SVG-safe id derived from an equipment id
///
/// Letters, digits and `-` are kept. Every other character, `_` included,
/// becomes `_<code point>_`, so distinct equipment ids never share an id.
fn svg_id(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            escaped.push(c);
        } else {
            escaped.push_str(&format!("_{}_", c as u32));
        }
    }
    escaped
}

/// Point where a wire meets a node
fn anchor(node: &Node, position: &NodePosition, other: &NodePosition) -> (f64, f64) {
    if node.is_busbar() {
        (other.x, position.y)
    } else {
        (position.x, position.y)
    }
}

struct SvgDocument<'a, 'c> {
    graph: &'a VoltageLevelGraph,
    layout: &'a DiagramLayout,
    config: &'a RenderConfig<'c>,
}

impl SvgDocument<'_, '_> {
    fn write(&self, out: &mut dyn Write) -> io::Result<()> {
        let params = self.config.layout_parameters;
        let width = 2.0 * params.translate_x + params.scale_factor * self.layout.width;
        let height = 2.0 * params.translate_y + params.scale_factor * self.layout.height;

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        )?;
        writeln!(out, "<title>{}</title>", escape_xml(&self.graph.voltage_level_name))?;
        writeln!(out, "<style><![CDATA[")?;
        write!(out, "{}", self.config.component_library.style_sheet())?;
        write!(out, "{}", self.config.style.css())?;
        writeln!(
            out,
            ".sld-label {{font-size: {}px}}",
            params.label_font_size
        )?;
        writeln!(out, "]]></style>")?;
        writeln!(
            out,
            r#"<g id="{}" transform="translate({},{}) scale({})">"#,
            svg_id(&self.graph.voltage_level_id),
            params.translate_x,
            params.translate_y,
            params.scale_factor
        )?;

        if params.show_grid && params.cell_width > 0.0 {
            self.write_grid(out)?;
        }
        self.write_wires(out)?;
        self.write_nodes(out)?;
        self.write_feeder_infos(out)?;

        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")?;
        Ok(())
    }

    fn write_grid(&self, out: &mut dyn Write) -> io::Result<()> {
        let params = self.config.layout_parameters;
        writeln!(out, r##"<g class="sld-grid" stroke="#e0e0e0" stroke-width="0.5">"##)?;
        let mut x = params.initial_x_bus;
        while x <= self.layout.width {
            writeln!(
                out,
                r#"<line x1="{x}" y1="0" x2="{x}" y2="{}"/>"#,
                self.layout.height
            )?;
            x += params.cell_width;
        }
        writeln!(out, "</g>")
    }

    fn write_wires(&self, out: &mut dyn Write) -> io::Result<()> {
        let params = self.config.layout_parameters;
        for (index, edge) in self.graph.edges.iter().enumerate() {
            let (node1, node2) = (&self.graph.nodes[edge.node1], &self.graph.nodes[edge.node2]);
            let (p1, p2) = (
                &self.layout.positions[edge.node1],
                &self.layout.positions[edge.node2],
            );
            let (x1, y1) = anchor(node1, p1, p2);
            let (x2, y2) = anchor(node2, p2, p1);
            let classes = self.config.style.wire_styles(self.graph, edge).join(" ");

            writeln!(
                out,
                r#"<polyline id="WIRE_{}" class="{}" points="{},{} {},{}"/>"#,
                index,
                escape_xml(&classes),
                x1,
                y1,
                x2,
                y2
            )?;

            if params.show_internal_nodes {
                for (node, x, y) in [(node1, x1, y1), (node2, x2, y2)] {
                    if node.is_busbar() {
                        writeln!(
                            out,
                            r#"<circle class="sld-internal-node" cx="{}" cy="{}" r="2"/>"#,
                            x, y
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_nodes(&self, out: &mut dyn Write) -> io::Result<()> {
        let library = self.config.component_library;
        for (node, position) in self.graph.nodes.iter().zip(&self.layout.positions) {
            let mut classes = Vec::new();
            if let Some(component) = library.component(node.component_type) {
                classes.push(component.style_class.to_string());
            }
            classes.extend(self.config.style.node_styles(self.graph, node));
            let classes = escape_xml(&classes.join(" "));
            let id = svg_id(&node.id);

            match (&node.kind, position.length) {
                (NodeKind::Busbar { .. }, Some(length)) => {
                    writeln!(
                        out,
                        r#"<line id="{}" class="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                        id,
                        classes,
                        position.x,
                        position.y,
                        position.x + length,
                        position.y
                    )?;
                },
                _ => {
                    let size = library.size(node.component_type);
                    let svg = library
                        .component(node.component_type)
                        .map(|component| component.svg)
                        .unwrap_or("");
                    writeln!(
                        out,
                        r#"<g id="{}" class="{}" transform="translate({},{})">{}</g>"#,
                        id,
                        classes,
                        position.x - size.width / 2.0,
                        position.y - size.height / 2.0,
                        svg
                    )?;
                },
            }

            for label in self.config.labels.node_labels(node, position.direction) {
                writeln!(
                    out,
                    r#"<text id="{}_{}" class="sld-label" x="{}" y="{}">{}</text>"#,
                    id,
                    svg_id(&label.id),
                    position.x + label.dx,
                    position.y + label.dy,
                    escape_xml(&label.text)
                )?;
            }

            if let Some(voltage) = self.config.initial_values.busbar_voltage(self.graph, node) {
                writeln!(
                    out,
                    r#"<text id="{}_VOLTAGE" class="sld-label sld-voltage" x="{}" y="{}">{}</text>"#,
                    id,
                    position.x,
                    position.y + f64::from(self.config.layout_parameters.label_font_size) + 2.0,
                    escape_xml(&voltage)
                )?;
            }
        }
        Ok(())
    }

    fn write_feeder_infos(&self, out: &mut dyn Write) -> io::Result<()> {
        let params = self.config.layout_parameters;
        for (node, position) in self.graph.nodes.iter().zip(&self.layout.positions) {
            // Arrows stack from the feeder symbol towards the busbar
            let step = match position.direction {
                Some(Direction::Bottom) => -params.arrow_distance,
                _ => params.arrow_distance,
            };
            let infos = self.config.initial_values.feeder_infos(self.graph, node);
            for (rank, info) in infos.iter().enumerate() {
                let y = position.y + step * (rank as f64 + 1.0);
                let rotation = match info.direction {
                    Some(ArrowDirection::In) if step > 0.0 => 0,
                    Some(ArrowDirection::Out) if step < 0.0 => 0,
                    Some(_) => 180,
                    None => 0,
                };
                let arrow_class = match info.direction {
                    Some(ArrowDirection::In) => "sld-arrow-in",
                    Some(ArrowDirection::Out) => "sld-arrow-out",
                    None => "sld-arrow-none",
                };
                let size = self.config.component_library.size(info.component_type);
                let svg = self
                    .config
                    .component_library
                    .component(info.component_type)
                    .map(|component| component.svg)
                    .unwrap_or("");

                writeln!(
                    out,
                    r#"<g id="{}_{}" class="{}" transform="translate({},{}) rotate({},{},{})">{}</g>"#,
                    svg_id(&node.id),
                    info.component_type.as_str(),
                    arrow_class,
                    position.x - size.width / 2.0,
                    y - size.height / 2.0,
                    rotation,
                    size.width / 2.0,
                    size.height / 2.0,
                    if info.direction.is_some() { svg } else { "" }
                )?;
                writeln!(
                    out,
                    r#"<text class="sld-label" x="{}" y="{}">{}</text>"#,
                    position.x + size.width,
                    y + size.height / 2.0,
                    escape_xml(&info.label)
                )?;
            }
        }
        Ok(())
    }

    fn metadata(&self) -> DiagramMetadata {
        let graph = self.graph;
        let config = self.config;

        let nodes = graph
            .nodes
            .iter()
            .zip(&self.layout.positions)
            .map(|(node, position)| NodeMetadata {
                id: svg_id(&node.id),
                v_id: graph.voltage_level_id.clone(),
                equipment_id: node.equipment_id.clone(),
                component_type: node.component_type,
                open: node.is_open(),
                direction: position.direction,
                label: config
                    .labels
                    .node_labels(node, position.direction)
                    .into_iter()
                    .next()
                    .map(|label| label.text),
                voltage: config.initial_values.busbar_voltage(graph, node),
            })
            .collect();

        let wires = graph
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| WireMetadata {
                id: format!("WIRE_{}", index),
                node_id1: svg_id(&graph.nodes[edge.node1].id),
                node_id2: svg_id(&graph.nodes[edge.node2].id),
                straight: true,
            })
            .collect();

        let feeder_infos = graph
            .nodes
            .iter()
            .flat_map(|node| {
                config
                    .initial_values
                    .feeder_infos(graph, node)
                    .into_iter()
                    .map(move |info| FeederInfoMetadata {
                        id: format!("{}_{}", svg_id(&node.id), info.component_type.as_str()),
                        equipment_id: node.equipment_id.clone(),
                        component_type: info.component_type,
                        direction: info.direction,
                        label: info.label,
                    })
            })
            .collect();

        let components = config
            .component_library
            .components()
            .iter()
            .map(|component| ComponentMetadata {
                component_type: component.component_type,
                size: component.size,
                style_class: component.style_class.to_string(),
            })
            .collect();

        DiagramMetadata {
            nodes,
            wires,
            feeder_infos,
            components,
            layout_parameters: config.layout_parameters.into(),
        }
    }
}

impl DiagramRenderer for DefaultSvgWriter {
    fn render(
        &self,
        graph_builder: &dyn GraphBuilder,
        voltage_level_id: &str,
        config: &RenderConfig<'_>,
        svg: &mut dyn Write,
        metadata: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let graph = graph_builder.build_voltage_level_graph(
            voltage_level_id,
            config.use_name,
            config.show_inductor_for_3wt,
        )?;
        let layout = config
            .layout_factory
            .create(&graph)
            .run(&graph, config.layout_parameters);

        debug!(
            "Rendering {} with {} library ({} nodes)",
            voltage_level_id,
            config.component_library.name(),
            graph.nodes.len()
        );

        let document = SvgDocument {
            graph: &graph,
            layout: &layout,
            config,
        };
        document.write(svg)?;
        serde_json::to_writer(&mut *metadata, &document.metadata()).map_err(io::Error::from)?;
        svg.flush()?;
        metadata.flush()?;
        Ok(())
    }
}
