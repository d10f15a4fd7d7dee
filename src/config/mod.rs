mod app_config;

pub use app_config::{
    AppConfig, LinkerConfig, LogFormat, LoggingConfig, ServiceConfig, StoreConfig,
    ValidatorConfig,
};
