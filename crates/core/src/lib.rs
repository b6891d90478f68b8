pub mod config;
pub mod error;
pub mod labels;
pub mod record;
pub mod types;

pub use config::{ApiConfig, AppConfig, AuthConfig, AuthMode, ModelConfig, RunConfig};
pub use error::CoreError;
pub use labels::LabelTable;
pub use record::{read_record, InputRecord};
pub use types::*;
