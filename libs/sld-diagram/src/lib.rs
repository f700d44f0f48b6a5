//! Single-line diagram library
//!
//! Turns one voltage level of a network into an SVG drawing and a JSON
//! metadata document. Every stage sits behind a trait so a richer engine can
//! replace any of them:
//!
//! - **GraphBuilder**: network → voltage level graph (`NetworkGraphBuilder`)
//! - **VoltageLevelLayoutFactory**: graph → layout (`SmartVoltageLevelLayoutFactory`)
//! - **ComponentLibrary**: symbols and style sheet (`ResourcesComponentLibrary`)
//! - **DiagramInitialValueProvider**, **DiagramStyleProvider**,
//!   **NodeLabelConfiguration**: values, CSS classes and labels
//! - **DiagramRenderer**: writes both documents (`DefaultSvgWriter`)

pub mod error;
pub mod graph;
pub mod layout;
pub mod library;
pub mod providers;
pub mod render;

pub use error::{GraphError, RenderError};
pub use graph::{ComponentType, GraphBuilder, NetworkGraphBuilder, VoltageLevelGraph};
pub use layout::{
    ImplicitVoltageLevelLayout, LayoutParameters, PositionVoltageLevelLayout,
    SmartVoltageLevelLayoutFactory, VoltageLevelLayout, VoltageLevelLayoutFactory,
};
pub use library::{ComponentLibrary, ResourcesComponentLibrary, LIBRARY_NAMES};
pub use providers::{
    DefaultDiagramInitialValueProvider, DefaultNodeLabelConfiguration,
    DiagramInitialValueProvider, DiagramStyleProvider, NodeLabelConfiguration,
    NominalVoltageDiagramStyleProvider,
};
pub use render::{DefaultSvgWriter, DiagramRenderer, RenderConfig};
