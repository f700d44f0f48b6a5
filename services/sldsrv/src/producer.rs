//! Diagram production for one voltage level
//!
//! The producer wires the diagram library's collaborators for a network and
//! hands them to the renderer in one [`RenderConfig`].

use crate::config::DiagramSettings;
use crate::error::{Result, SldSrvError};
use sld_diagram::{
    ComponentLibrary, DefaultDiagramInitialValueProvider, DefaultNodeLabelConfiguration,
    DefaultSvgWriter, DiagramRenderer, LayoutParameters, NetworkGraphBuilder,
    NominalVoltageDiagramStyleProvider, RenderConfig, RenderError, ResourcesComponentLibrary,
    SmartVoltageLevelLayoutFactory,
};
use sld_network::Network;
use std::io;
use std::sync::Arc;
use tracing::debug;

/// Diagram settings shared read-only by every request
pub struct DiagramConfig {
    pub component_library: Arc<dyn ComponentLibrary>,
    pub layout_parameters: LayoutParameters,
}

impl DiagramConfig {
    pub fn new(component_library: Arc<dyn ComponentLibrary>, layout_parameters: LayoutParameters) -> Self {
        Self {
            component_library,
            layout_parameters,
        }
    }

    pub fn from_settings(settings: &DiagramSettings) -> Result<Self> {
        let library = ResourcesComponentLibrary::by_name(&settings.component_library)
            .ok_or_else(|| {
                SldSrvError::invalid_config(
                    "diagram.component_library",
                    format!("unknown library '{}'", settings.component_library),
                )
            })?;
        Ok(Self::new(Arc::new(library), settings.layout.clone()))
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self::new(
            Arc::new(ResourcesComponentLibrary::convergence()),
            LayoutParameters::default(),
        )
    }
}

/// SVG drawing and JSON metadata of one voltage level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgAndMetadata {
    pub svg: String,
    pub metadata: String,
}

#[derive(Clone)]
pub struct DiagramProducer {
    config: Arc<DiagramConfig>,
    renderer: Arc<dyn DiagramRenderer>,
}

impl DiagramProducer {
    pub fn new(config: Arc<DiagramConfig>) -> Self {
        Self::with_renderer(config, Arc::new(DefaultSvgWriter::new()))
    }

    pub fn with_renderer(config: Arc<DiagramConfig>, renderer: Arc<dyn DiagramRenderer>) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn produce(
        &self,
        network: &Network,
        voltage_level_id: &str,
        use_name: bool,
    ) -> Result<SvgAndMetadata> {
        if network.voltage_level(voltage_level_id).is_none() {
            return Err(SldSrvError::VoltageLevelNotFound(voltage_level_id.to_string()));
        }

        let library = self.config.component_library.as_ref();
        let layout_factory = SmartVoltageLevelLayoutFactory::new(network);
        let initial_values = DefaultDiagramInitialValueProvider::new(network);
        let labels = DefaultNodeLabelConfiguration::new(library);
        let render_config = RenderConfig {
            use_name,
            show_inductor_for_3wt: false,
            layout_factory: &layout_factory,
            component_library: library,
            layout_parameters: &self.config.layout_parameters,
            initial_values: &initial_values,
            style: &NominalVoltageDiagramStyleProvider,
            labels: &labels,
        };

        let mut svg: Vec<u8> = Vec::new();
        let mut metadata: Vec<u8> = Vec::new();
        self.renderer
            .render(
                &NetworkGraphBuilder::new(network),
                voltage_level_id,
                &render_config,
                &mut svg,
                &mut metadata,
            )
            .map_err(|e| match e {
                RenderError::Graph(err) => SldSrvError::Graph(err),
                RenderError::Io(err) => SldSrvError::Io(err),
            })?;

        debug!(
            "Rendered {} ({} bytes svg, {} bytes metadata)",
            voltage_level_id,
            svg.len(),
            metadata.len()
        );

        Ok(SvgAndMetadata {
            svg: into_text(svg)?,
            metadata: into_text(metadata)?,
        })
    }
}

fn into_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| SldSrvError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_diagram::GraphBuilder;
    use sld_network::fixtures::sample_network;
    use std::io::Write;

    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn render(
            &self,
            _graph_builder: &dyn GraphBuilder,
            _voltage_level_id: &str,
            _config: &RenderConfig<'_>,
            _svg: &mut dyn Write,
            _metadata: &mut dyn Write,
        ) -> std::result::Result<(), RenderError> {
            Err(RenderError::Io(io::Error::other("stream closed")))
        }
    }

    struct BinaryRenderer;

    impl DiagramRenderer for BinaryRenderer {
        fn render(
            &self,
            _graph_builder: &dyn GraphBuilder,
            _voltage_level_id: &str,
            _config: &RenderConfig<'_>,
            svg: &mut dyn Write,
            metadata: &mut dyn Write,
        ) -> std::result::Result<(), RenderError> {
            svg.write_all(&[0xff, 0xfe])?;
            metadata.write_all(b"{}")?;
            Ok(())
        }
    }

    fn producer() -> DiagramProducer {
        DiagramProducer::new(Arc::new(DiagramConfig::default()))
    }

    #[test]
    fn test_produce_existing_voltage_level() {
        let network = sample_network();
        let result = producer().produce(&network, "VL1", true).unwrap();

        assert!(result.svg.contains("<svg"));
        assert!(result.svg.contains("Generator 1"));
        let metadata: serde_json::Value = serde_json::from_str(&result.metadata).unwrap();
        assert!(metadata["nodes"].as_array().is_some_and(|nodes| !nodes.is_empty()));
    }

    #[test]
    fn test_produce_is_idempotent() {
        let network = sample_network();
        let producer = producer();
        let first = producer.produce(&network, "VL1", false).unwrap();
        let second = producer.produce(&network, "VL1", false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_use_name_switches_labels() {
        let network = sample_network();
        let producer = producer();
        let by_name = producer.produce(&network, "VL1", true).unwrap();
        let by_id = producer.produce(&network, "VL1", false).unwrap();
        assert!(by_name.svg.contains(">Generator 1</text>"));
        assert!(!by_id.svg.contains(">Generator 1</text>"));
        assert!(by_id.svg.contains(">GEN1</text>"));
    }

    #[test]
    fn test_unknown_voltage_level() {
        let network = sample_network();
        let err = producer().produce(&network, "VLX", false).unwrap_err();
        assert!(matches!(err, SldSrvError::VoltageLevelNotFound(ref id) if id == "VLX"));
        assert_eq!(err.to_string(), "Voltage level VLX not found");
    }

    #[test]
    fn test_renderer_failure_is_io() {
        let network = sample_network();
        let producer =
            DiagramProducer::with_renderer(Arc::new(DiagramConfig::default()), Arc::new(FailingRenderer));
        let err = producer.produce(&network, "VL1", false).unwrap_err();
        assert!(matches!(err, SldSrvError::Io(_)));
    }

    #[test]
    fn test_non_utf8_output_is_invalid_data() {
        let network = sample_network();
        let producer =
            DiagramProducer::with_renderer(Arc::new(DiagramConfig::default()), Arc::new(BinaryRenderer));
        match producer.produce(&network, "VL1", false) {
            Err(SldSrvError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = DiagramSettings::default();
        settings.component_library = "FlatDesign".to_string();
        settings.layout.scale_factor = 2.0;
        let config = DiagramConfig::from_settings(&settings).unwrap();
        assert_eq!(config.component_library.name(), "FlatDesign");
        assert_eq!(config.layout_parameters.scale_factor, 2.0);

        settings.component_library = "Unknown".to_string();
        assert!(DiagramConfig::from_settings(&settings).is_err());
    }
}
