//! Error types for sld-diagram

use thiserror::Error;

/// Failures while turning a voltage level into a diagram graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Voltage level {0} not found in network")]
    VoltageLevelNotFound(String),

    #[error("{equipment} references unknown busbar section {busbar_section}")]
    UnknownBusbarSection {
        equipment: String,
        busbar_section: String,
    },

    #[error("Duplicate equipment id {0} in voltage level")]
    DuplicateId(String),
}

/// Failures while rendering a diagram
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Failed to write diagram: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_messages() {
        let err = GraphError::UnknownBusbarSection {
            equipment: "LOAD1".to_string(),
            busbar_section: "BBS9".to_string(),
        };
        assert_eq!(err.to_string(), "LOAD1 references unknown busbar section BBS9");

        let render: RenderError = err.clone().into();
        assert_eq!(render.to_string(), err.to_string());
    }
}
