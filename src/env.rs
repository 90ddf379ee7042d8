//! Environment constants and path utilities for quadlet-gen.
//!
//! This module centralizes the configuration file names and locations used by
//! the configuration discovery hierarchy.

use std::path::{Path, PathBuf};

/// Hidden per-project directory name
pub const APP_DIR_NAME: &str = ".quadlet-gen";

/// Configuration file name inside a configuration directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up directly in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "quadlet-gen.toml";

/// User configuration directory, relative to the home directory
pub const USER_CONFIG_DIR: &str = ".config/quadlet-gen";

/// System-wide configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/quadlet-gen";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "quadlet_gen=info";

/// Log filter used with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "quadlet_gen=debug";

/// `./quadlet-gen.toml`
pub fn local_config_file_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(LOCAL_CONFIG_FILE_NAME)
}

/// `./.quadlet-gen/config.toml`
pub fn local_dir_config_file_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// `~/.config/quadlet-gen`
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(USER_CONFIG_DIR)
}

/// `~/.config/quadlet-gen/config.toml`
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// `/etc/quadlet-gen/config.toml`
pub fn system_config_file_path() -> PathBuf {
    Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE_NAME)
}
