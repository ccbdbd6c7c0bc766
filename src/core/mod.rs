pub mod calculator;
pub mod conveyor;
pub mod currency_pipeline;
pub mod db_service;
pub mod etl;
pub mod handlers;
pub mod input;
pub mod temperature;
pub mod top_k;
pub mod wifi_service;

pub use crate::domain::model::{Currency, ValCurs};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
