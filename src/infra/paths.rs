// src/infra/paths.rs — Config path resolution
//
// PROMPTREPEAT_HOME overrides everything. Otherwise config lives in
// ~/.promptrepeat/.

use std::path::PathBuf;

/// Returns the PROMPTREPEAT_HOME override, if set.
fn promptrepeat_home() -> Option<PathBuf> {
    std::env::var_os("PROMPTREPEAT_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $PROMPTREPEAT_HOME/ or ~/.promptrepeat/
pub fn config_dir() -> PathBuf {
    if let Some(home) = promptrepeat_home() {
        return home;
    }
    dirs_home().join(".promptrepeat")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
