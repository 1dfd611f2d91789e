pub mod config;
pub mod scenarios;
pub mod tamper;
pub mod timeline;

pub use config::{load_demo_config, DemoConfig, Scenario};
pub use scenarios::{Demo, ExpiryReport, TamperReport};
pub use tamper::tamper_payload;
pub use timeline::Timeline;
