//! Component libraries
//!
//! A library maps each [`ComponentType`] to an SVG symbol, its size and the
//! CSS class drawn on it, and ships the style sheet embedded in diagrams.

use crate::graph::ComponentType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentSize {
    pub width: f64,
    pub height: f64,
}

/// One drawable symbol
///
/// `svg` is drawn with its origin at the top-left corner of `size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub component_type: ComponentType,
    pub size: ComponentSize,
    pub style_class: &'static str,
    pub svg: &'static str,
}

pub trait ComponentLibrary: Send + Sync {
    fn name(&self) -> &str;

    fn component(&self, component_type: ComponentType) -> Option<&Component>;

    /// All components in a stable order
    fn components(&self) -> &[Component];

    fn style_sheet(&self) -> &str;

    fn size(&self, component_type: ComponentType) -> ComponentSize {
        self.component(component_type)
            .map(|component| component.size)
            .unwrap_or(ComponentSize {
                width: 0.0,
                height: 0.0,
            })
    }
}

/// Library built from embedded symbol resources
#[derive(Debug, Clone)]
pub struct ResourcesComponentLibrary {
    name: &'static str,
    components: Vec<Component>,
    style_sheet: &'static str,
}

/// Names accepted by [`ResourcesComponentLibrary::by_name`]
pub const LIBRARY_NAMES: [&str; 2] = ["Convergence", "FlatDesign"];

const CONVERGENCE_CSS: &str = "\
.sld-busbar-section {stroke-width: 3; fill: none}
.sld-wire {stroke-width: 1; fill: none}
.sld-breaker {stroke-width: 1.5; fill: currentColor}
.sld-breaker.sld-open {fill: none}
.sld-disconnector {stroke-width: 1.5; fill: none}
.sld-feeder {stroke-width: 1.5; fill: none}
.sld-disconnected {stroke: #808080; color: #808080}
.sld-label {stroke: none; fill: black; font-family: sans-serif}
.sld-arrow-in, .sld-arrow-out {stroke: none; fill: black}
.sld-internal-node {stroke: none; fill: black}
";

const FLAT_DESIGN_CSS: &str = "\
.sld-busbar-section {stroke-width: 4; fill: none}
.sld-wire {stroke-width: 1.5; fill: none}
.sld-breaker {stroke-width: 2; fill: white}
.sld-disconnector {stroke-width: 2; fill: none}
.sld-feeder {stroke-width: 2; fill: white}
.sld-breaker.sld-open {fill: none}
.sld-disconnected {stroke: #a0a0a0; color: #a0a0a0}
.sld-label {stroke: none; fill: #303030; font-family: sans-serif}
.sld-arrow-in, .sld-arrow-out {stroke: none; fill: #303030}
.sld-internal-node {stroke: none; fill: #303030}
";

fn component(
    component_type: ComponentType,
    width: f64,
    height: f64,
    style_class: &'static str,
    svg: &'static str,
) -> Component {
    Component {
        component_type,
        size: ComponentSize { width, height },
        style_class,
        svg,
    }
}

impl ResourcesComponentLibrary {
    /// Default library
    pub fn convergence() -> Self {
        Self {
            name: "Convergence",
            components: vec![
                component(ComponentType::BusbarSection, 0.0, 0.0, "sld-busbar-section", ""),
                component(
                    ComponentType::Breaker,
                    8.0,
                    8.0,
                    "sld-breaker",
                    r#"<rect x="0" y="0" width="8" height="8"/>"#,
                ),
                component(
                    ComponentType::Disconnector,
                    8.0,
                    8.0,
                    "sld-disconnector",
                    r#"<path d="M0,8 L8,0"/>"#,
                ),
                component(
                    ComponentType::LoadBreakSwitch,
                    8.0,
                    8.0,
                    "sld-breaker",
                    r#"<rect x="0" y="0" width="8" height="8"/><path d="M0,8 L8,0"/>"#,
                ),
                component(
                    ComponentType::Load,
                    12.0,
                    8.0,
                    "sld-feeder",
                    r#"<path d="M0,0 L12,0 L6,8 Z"/>"#,
                ),
                component(
                    ComponentType::Generator,
                    16.0,
                    16.0,
                    "sld-feeder",
                    r#"<circle cx="8" cy="8" r="8"/><path d="M4,8 Q6,4 8,8 T12,8"/>"#,
                ),
                component(
                    ComponentType::Line,
                    8.0,
                    12.0,
                    "sld-feeder",
                    r#"<path d="M4,0 L4,12 M0,4 L4,0 L8,4"/>"#,
                ),
                component(
                    ComponentType::TwoWindingsTransformer,
                    16.0,
                    24.0,
                    "sld-feeder",
                    r#"<circle cx="8" cy="8" r="8"/><circle cx="8" cy="16" r="8"/>"#,
                ),
                component(
                    ComponentType::ThreeWindingsTransformer,
                    24.0,
                    24.0,
                    "sld-feeder",
                    r#"<circle cx="12" cy="8" r="8"/><circle cx="6" cy="16" r="8"/><circle cx="18" cy="16" r="8"/>"#,
                ),
                component(
                    ComponentType::Inductor,
                    8.0,
                    16.0,
                    "sld-feeder",
                    r#"<path d="M4,0 C12,2 12,6 4,8 C12,10 12,14 4,16"/>"#,
                ),
                component(
                    ComponentType::Capacitor,
                    12.0,
                    8.0,
                    "sld-feeder",
                    r#"<path d="M0,2 L12,2 M0,6 L12,6 M6,0 L6,2 M6,6 L6,8"/>"#,
                ),
                component(
                    ComponentType::Battery,
                    12.0,
                    10.0,
                    "sld-feeder",
                    r#"<path d="M0,3 L12,3 M3,7 L9,7 M6,0 L6,3 M6,7 L6,10"/>"#,
                ),
                component(
                    ComponentType::DanglingLine,
                    8.0,
                    12.0,
                    "sld-feeder",
                    r#"<path d="M4,0 L4,12 M0,12 L8,12"/>"#,
                ),
                component(
                    ComponentType::ArrowActive,
                    10.0,
                    10.0,
                    "sld-arrow-active",
                    r#"<path d="M5,0 L10,10 L0,10 Z"/>"#,
                ),
                component(
                    ComponentType::ArrowReactive,
                    10.0,
                    10.0,
                    "sld-arrow-reactive",
                    r#"<path d="M5,0 L10,10 L0,10 Z" fill="none"/>"#,
                ),
            ],
            style_sheet: CONVERGENCE_CSS,
        }
    }

    /// Flat variant: same geometry, plain outlined symbols
    pub fn flat_design() -> Self {
        let mut library = Self::convergence();
        library.name = "FlatDesign";
        library.style_sheet = FLAT_DESIGN_CSS;
        for component in &mut library.components {
            component.svg = match component.component_type {
                ComponentType::Breaker => r#"<rect x="0" y="0" width="8" height="8" rx="1"/>"#,
                ComponentType::Generator => r#"<circle cx="8" cy="8" r="8"/>"#,
                ComponentType::Load => r#"<rect x="0" y="0" width="12" height="8"/>"#,
                _ => component.svg,
            };
        }
        library
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "Convergence" => Some(Self::convergence()),
            "FlatDesign" => Some(Self::flat_design()),
            _ => None,
        }
    }
}

impl ComponentLibrary for ResourcesComponentLibrary {
    fn name(&self) -> &str {
        self.name
    }

    fn component(&self, component_type: ComponentType) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.component_type == component_type)
    }

    fn components(&self) -> &[Component] {
        &self.components
    }

    fn style_sheet(&self) -> &str {
        self.style_sheet
    }
}
