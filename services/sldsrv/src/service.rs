//! Single-line diagram service
//!
//! Resolves the network, produces the diagram and, for the zip variant,
//! packages both documents.

use crate::archive;
use crate::error::{Result, SldSrvError};
use crate::producer::{DiagramProducer, SvgAndMetadata};
use crate::resolver::NetworkResolver;
use errors::ServiceErrorTrait;
use tracing::{debug, error, info, warn, Level};
use uuid::Uuid;

#[derive(Clone)]
pub struct SingleLineDiagramService {
    resolver: NetworkResolver,
    producer: DiagramProducer,
}

impl SingleLineDiagramService {
    pub fn new(resolver: NetworkResolver, producer: DiagramProducer) -> Self {
        Self { resolver, producer }
    }

    pub fn resolver(&self) -> &NetworkResolver {
        &self.resolver
    }

    pub async fn generate_svg_and_metadata(
        &self,
        network_uuid: Uuid,
        voltage_level_id: &str,
        use_name: bool,
    ) -> Result<SvgAndMetadata> {
        debug!(
            "Generating diagram for network {} voltage level {} (useName={})",
            network_uuid, voltage_level_id, use_name
        );
        self.render(network_uuid, voltage_level_id, use_name)
            .await
            .inspect_err(|e| log_failure(network_uuid, voltage_level_id, e))
    }

    pub async fn generate_svg_and_metadata_zip(
        &self,
        network_uuid: Uuid,
        voltage_level_id: &str,
        use_name: bool,
    ) -> Result<Vec<u8>> {
        debug!(
            "Generating diagram archive for network {} voltage level {} (useName={})",
            network_uuid, voltage_level_id, use_name
        );
        self.render(network_uuid, voltage_level_id, use_name)
            .await
            .and_then(|diagram| {
                archive::package(voltage_level_id, &diagram.svg, &diagram.metadata)
            })
            .inspect_err(|e| log_failure(network_uuid, voltage_level_id, e))
    }

    async fn render(
        &self,
        network_uuid: Uuid,
        voltage_level_id: &str,
        use_name: bool,
    ) -> Result<SvgAndMetadata> {
        let network = self.resolver.resolve(network_uuid).await?;
        self.producer.produce(&network, voltage_level_id, use_name)
    }
}

fn log_failure(network_uuid: Uuid, voltage_level_id: &str, err: &SldSrvError) {
    let code = err.error_code();
    match err.log_level() {
        Level::ERROR => error!(
            "Diagram {}/{} failed [{}]: {}",
            network_uuid, voltage_level_id, code, err
        ),
        Level::WARN => warn!(
            "Diagram {}/{} failed [{}]: {}",
            network_uuid, voltage_level_id, code, err
        ),
        Level::INFO => info!(
            "Diagram {}/{} failed [{}]: {}",
            network_uuid, voltage_level_id, code, err
        ),
        _ => debug!(
            "Diagram {}/{} failed [{}]: {}",
            network_uuid, voltage_level_id, code, err
        ),
    }
}
