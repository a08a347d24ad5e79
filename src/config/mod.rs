//! Configuration module.
//!
//! [`policy`] holds the named heuristic constants and their grouping structs;
//! [`loader`] resolves them from defaults, a TOML file, environment, and CLI.

pub mod loader;
pub mod policy;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
pub use policy::{
    ContainerChrome, KeyboardPolicy, PerformanceBudget, SafeAreaFloors, TransitionContract,
};
