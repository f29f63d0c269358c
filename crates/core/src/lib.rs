pub mod config;
pub mod error;
pub mod related;
pub mod types;

pub use config::{HubConfig, load_hub_config};
pub use error::{Error, Result};
pub use related::{related_by_category, shares_category};
pub use types::*;
