//! Configuration file location.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory under the home directory holding pingctl state.
pub const CONFIG_DIR_NAME: &str = ".pingctl";

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// `$HOME/.pingctl/config.yaml`.
///
/// Overridden by `--config` or `PINGCTL_CONFIG`, which clap handles before
/// this is consulted.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .context("Could not determine home directory; pass --config or set PINGCTL_CONFIG")?;
    Ok(config_path_in(home))
}

fn config_path_in(home: PathBuf) -> PathBuf {
    home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_in_home() {
        let path = config_path_in(PathBuf::from("/home/user"));
        assert_eq!(path, PathBuf::from("/home/user/.pingctl/config.yaml"));
    }
}
