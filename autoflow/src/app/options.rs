//! Application configuration options

use crate::logs::LogOptions;
use crate::sim::session::SimulationOptions;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Storage layout paths
    pub layout: StorageLayout,

    /// Settings read from the layout's settings file
    pub settings: Settings,
}

impl AppOptions {
    /// Read the settings file of `layout`
    pub async fn load(layout: StorageLayout) -> Self {
        let settings = Settings::load(&layout.settings_file()).await;
        Self { layout, settings }
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.settings.log_level,
            json_format: self.settings.json_logs,
        }
    }

    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions::from(&self.settings.simulation)
    }
}
