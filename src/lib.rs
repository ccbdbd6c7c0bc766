pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::wifi::SysfsWifi;
pub use crate::config::{cli::LocalStorage, ExportConfig};
pub use crate::core::{
    conveyor::Conveyor, currency_pipeline::CurrencyPipeline, db_service::DbService,
    etl::ExportEngine, wifi_service::WifiService,
};
pub use crate::utils::error::{Result, TaskError};
