//! Sample networks for tests

use crate::model::*;
use uuid::Uuid;

/// Key under which tests usually store [`sample_network`]
pub const SAMPLE_NETWORK_ID: Uuid = Uuid::from_u128(0x7928_181c_7977_4592_ba19_8897_6da5_a8ba);

/// One substation with two voltage levels
///
/// - `VL1` (400 kV, named "Voltage level 1"): two busbars joined by a closed
///   breaker, three feeders that all carry an explicit order
/// - `VL2` (225 kV): one busbar and two feeders without order, one of them
///   disconnected
pub fn sample_network() -> Network {
    Network {
        id: "sample".to_string(),
        name: Some("Sample grid".to_string()),
        substations: vec![Substation {
            id: "S1".to_string(),
            name: Some("Substation 1".to_string()),
            country: Some("FR".to_string()),
            voltage_levels: vec![vl1(), vl2()],
        }],
    }
}

fn busbar(id: &str, name: &str, busbar_index: u32, v: f64) -> BusbarSection {
    BusbarSection {
        id: id.to_string(),
        name: Some(name.to_string()),
        busbar_index,
        section_index: 1,
        v: Some(v),
        angle: Some(0.0),
    }
}

fn feeder(id: &str, name: &str, kind: FeederKind, busbar_section: &str) -> Feeder {
    Feeder {
        id: id.to_string(),
        name: Some(name.to_string()),
        kind,
        busbar_section: busbar_section.to_string(),
        order: None,
        direction: None,
        p: None,
        q: None,
        connected: true,
    }
}

fn vl1() -> VoltageLevel {
    VoltageLevel {
        id: "VL1".to_string(),
        name: Some("Voltage level 1".to_string()),
        nominal_v: 400.0,
        topology_kind: TopologyKind::NodeBreaker,
        busbar_sections: vec![
            busbar("BBS1", "Busbar 1", 1, 401.2),
            busbar("BBS2", "Busbar 2", 2, 400.8),
        ],
        feeders: vec![
            Feeder {
                order: Some(20),
                direction: Some(Direction::Bottom),
                p: Some(80.0),
                q: Some(12.5),
                ..feeder("LOAD1", "Load 1", FeederKind::Load, "BBS1")
            },
            Feeder {
                order: Some(10),
                direction: Some(Direction::Top),
                p: Some(-120.0),
                q: Some(-30.0),
                ..feeder("GEN1", "Generator 1", FeederKind::Generator, "BBS1")
            },
            Feeder {
                order: Some(30),
                direction: Some(Direction::Top),
                p: Some(40.0),
                q: Some(17.5),
                ..feeder("LINE1", "Line 1", FeederKind::Line, "BBS2")
            },
        ],
        switches: vec![Switch {
            id: "COUPLER1".to_string(),
            name: Some("Coupler 1".to_string()),
            kind: SwitchKind::Breaker,
            open: false,
            busbar_section1: "BBS1".to_string(),
            busbar_section2: "BBS2".to_string(),
        }],
    }
}

fn vl2() -> VoltageLevel {
    VoltageLevel {
        id: "VL2".to_string(),
        name: None,
        nominal_v: 225.0,
        topology_kind: TopologyKind::BusBreaker,
        busbar_sections: vec![busbar("VL2_BBS1", "Busbar", 1, 224.1)],
        feeders: vec![
            Feeder {
                p: Some(-40.0),
                q: Some(-17.5),
                ..feeder("TR1", "Transformer 1", FeederKind::TwoWindingsTransformer, "VL2_BBS1")
            },
            Feeder {
                connected: false,
                ..feeder("SHUNT1", "Shunt 1", FeederKind::ShuntCompensator, "VL2_BBS1")
            },
        ],
        switches: vec![],
    }
}
