//! Relay core: player registry and the serialized event loop

pub mod registry;
pub mod relay;

pub use registry::{PlayerRegistry, PlayerState, HIT_DAMAGE, MAX_HEALTH, SPAWN_HEIGHT};
pub use relay::{Outbound, RelayCommand, RelayHandle, Scope};
