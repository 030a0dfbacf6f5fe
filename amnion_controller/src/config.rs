//! Controller configuration loading.
//!
//! Thin wrappers over the shared loaders that also validate every section,
//! so a loaded [`AmnionConfig`] is always usable by [`Controller::new`].
//!
//! [`Controller::new`]: crate::cycle::Controller::new

use std::fmt;
use std::path::{Path, PathBuf};

use amnion_common::config::{ConfigError, ConfigLoader};
use amnion_common::controller::config::AmnionConfig;

/// Where [`resolve`] took the configuration from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Merged `*.toml` files of a directory.
    Dir(PathBuf),
    /// A single file.
    File(PathBuf),
    /// Built-in defaults; the default path did not exist.
    Defaults { missing: PathBuf },
}

impl ConfigSource {
    #[inline]
    pub const fn is_defaults(&self) -> bool {
        matches!(self, Self::Defaults { .. })
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dir(dir) => write!(f, "directory {}", dir.display()),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Defaults { missing } => {
                write!(f, "built-in defaults (no config at '{}')", missing.display())
            }
        }
    }
}

/// Load and validate a single TOML file.
pub fn load_config(path: &Path) -> Result<AmnionConfig, ConfigError> {
    let cfg = AmnionConfig::load(path)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load, merge and validate every `*.toml` in `dir` (sorted by name).
pub fn load_config_dir(dir: &Path) -> Result<AmnionConfig, ConfigError> {
    let cfg: AmnionConfig = amnion_common::config::load_config_dir(dir)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse and validate a TOML string.
pub fn load_config_from_str(text: &str) -> Result<AmnionConfig, ConfigError> {
    let cfg = AmnionConfig::from_toml(text)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the CLI configuration source.
///
/// A directory wins over a file. A missing file at the default path falls
/// back to built-in defaults; a missing explicit path is an error.
///
/// Does not log: it runs before the subscriber exists, so the caller
/// reports the returned [`ConfigSource`] once tracing is up.
pub fn resolve(
    config_dir: Option<&Path>,
    config: &Path,
    is_default_path: bool,
) -> Result<(AmnionConfig, ConfigSource), ConfigError> {
    if let Some(dir) = config_dir {
        let cfg = load_config_dir(dir)?;
        return Ok((cfg, ConfigSource::Dir(dir.to_path_buf())));
    }
    if is_default_path && !config.exists() {
        let cfg = AmnionConfig::default();
        cfg.validate()?;
        return Ok((
            cfg,
            ConfigSource::Defaults {
                missing: config.to_path_buf(),
            },
        ));
    }
    let cfg = load_config(config)?;
    Ok((cfg, ConfigSource::File(config.to_path_buf())))
}
