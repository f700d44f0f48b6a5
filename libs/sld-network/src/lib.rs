//! Grid network model and network store abstraction
//!
//! # Key Components
//!
//! - **Network model**: substations, voltage levels, busbar sections, feeders
//!   and couplings, exchanged as camelCase JSON
//! - **NetworkStore trait**: async lookup of a network by UUID
//! - **Backends**: `MemoryNetworkStore` (in-memory / directory) and
//!   `RestNetworkStore` (remote HTTP store)

pub mod error;
pub mod memory_impl;
pub mod model;
pub mod rest_impl;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

pub use error::{Result, StoreError};
pub use memory_impl::MemoryNetworkStore;
pub use model::{
    BusbarSection, Direction, Feeder, FeederKind, Network, Substation, Switch, SwitchKind,
    TopologyKind, VoltageLevel,
};
pub use rest_impl::RestNetworkStore;
pub use traits::NetworkStore;
