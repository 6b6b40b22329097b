// Application state module
// Immutable configuration shared across connections

use super::types::Config;

/// Application state
///
/// There is no runtime reconfiguration, so the state is plain data behind an
/// `Arc` with no interior mutability.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}
