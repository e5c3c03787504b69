pub mod loader;
pub mod migration;
pub mod validator;

pub use loader::{load_config, load_config_from_str, store_config, ConfigLoad, LoadError};
pub use migration::CodeRemap;
pub use validator::{validate_config, ValidationError};
