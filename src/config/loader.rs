//! Configuration loading
//!
//! Resolves the active config file (custom path, then project, then user
//! level), parses it over built-in defaults, and owns the write paths used by
//! `config init`, `config reset` and `theme`.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tokio::fs;
use toml_edit::{value, DocumentMut};

use crate::config::schema::Config;
use crate::themes::Theme;
use crate::utils;

/// Project-level config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "statusline.toml";

const USER_CONFIG_DIR: &str = "tmux-statusline";
const USER_CONFIG_FILE: &str = "config.toml";

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceType {
    Default,
    User,
    Project,
    Custom,
}

/// Resolved configuration source
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub source_type: ConfigSourceType,
    pub path: Option<PathBuf>,
}

/// Options for creating a config file from the built-in template
#[derive(Debug, Default)]
pub struct CreateConfigOptions<'a> {
    /// Target file; defaults to the user-level config path
    pub target_path: Option<&'a Path>,
    /// Theme written into the new file
    pub theme: Option<&'a str>,
    /// Overwrite an existing file
    pub force: bool,
}

/// Result of creating a config file
#[derive(Debug)]
pub struct CreatedConfig {
    pub path: PathBuf,
}

/// Layered configuration loader
#[derive(Default)]
pub struct ConfigLoader {
    source: Option<ConfigSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration, trying the custom path, the project file and the
    /// user file in that order before falling back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing config file cannot be read or
    /// parsed, or when a custom path does not exist.
    pub async fn load(&mut self, custom_path: Option<&str>) -> Result<Config> {
        if let Some(custom) = custom_path {
            let path = PathBuf::from(custom);
            let config = Self::read_config(&path).await?;
            self.source = Some(ConfigSource {
                source_type: ConfigSourceType::Custom,
                path: Some(path),
            });
            return Ok(config);
        }

        if let Ok(project) = self.project_config_path() {
            if project.exists() {
                let config = Self::read_config(&project).await?;
                self.source = Some(ConfigSource {
                    source_type: ConfigSourceType::Project,
                    path: Some(project),
                });
                return Ok(config);
            }
        }

        if let Some(user) = self.user_config_path() {
            if user.exists() {
                let config = Self::read_config(&user).await?;
                self.source = Some(ConfigSource {
                    source_type: ConfigSourceType::User,
                    path: Some(user),
                });
                return Ok(config);
            }
        }

        self.source = Some(ConfigSource {
            source_type: ConfigSourceType::Default,
            path: None,
        });
        Ok(Config::default())
    }

    /// Source resolved by the last [`ConfigLoader::load`] call
    #[must_use]
    pub fn get_config_source(&self) -> Option<&ConfigSource> {
        self.source.as_ref()
    }

    /// User-level config path under the platform config directory
    #[must_use]
    pub fn user_config_path(&self) -> Option<PathBuf> {
        utils::config_base_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
    }

    /// Project-level config path in the current working directory
    ///
    /// # Errors
    ///
    /// Returns an error when the working directory is unavailable.
    pub fn project_config_path(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()
            .context("cannot determine current working directory")?
            .join(PROJECT_CONFIG_FILE))
    }

    /// Project-level config path for an explicit project directory
    #[must_use]
    pub fn project_config_path_for(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Create a config file from the built-in template.
    ///
    /// # Errors
    ///
    /// Returns an error when the target exists without `force`, when the
    /// template cannot be rendered, or on I/O failure.
    pub fn create_default_config(options: CreateConfigOptions<'_>) -> Result<CreatedConfig> {
        let target = match options.target_path {
            Some(path) => path.to_path_buf(),
            None => Self::new()
                .user_config_path()
                .ok_or_else(|| anyhow!("cannot determine user config path"))?,
        };

        if target.exists() && !options.force {
            bail!("config file already exists: {}", target.display());
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create config directory: {}", parent.display()))?;
        }

        let mut document = Self::default_template()?;
        if let Some(theme) = options.theme {
            Self::set_theme(&mut document, theme)?;
        }

        std::fs::write(&target, document.to_string())
            .with_context(|| format!("cannot write config file: {}", target.display()))?;

        Ok(CreatedConfig { path: target })
    }

    /// Apply a theme to the active config file, creating the user-level file
    /// when none exists yet. Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown theme names and on I/O failure.
    pub async fn apply_theme(&mut self, name: &str) -> Result<PathBuf> {
        let target = if let Ok(project) = self.project_config_path() {
            if project.exists() {
                project
            } else {
                self.ensure_user_config()?
            }
        } else {
            self.ensure_user_config()?
        };

        Self::apply_theme_to(&target, name).await?;
        Ok(target)
    }

    /// Rewrite a config file (or the user-level file) with the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub async fn reset_to_defaults(&mut self, file: Option<&str>) -> Result<PathBuf> {
        let target = match file {
            Some(path) => PathBuf::from(path),
            None => self
                .user_config_path()
                .ok_or_else(|| anyhow!("cannot determine user config path"))?,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("cannot create config directory: {}", parent.display()))?;
        }

        let document = Self::default_template()?;
        fs::write(&target, document.to_string())
            .await
            .with_context(|| format!("cannot write config file: {}", target.display()))?;

        Ok(target)
    }

    /// Edit the theme key of an existing file, preserving its formatting.
    async fn apply_theme_to(path: &Path, name: &str) -> Result<()> {
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read config file: {}", path.display()))?;
        let mut document = raw
            .parse::<DocumentMut>()
            .with_context(|| format!("config file is not valid TOML: {}", path.display()))?;

        Self::set_theme(&mut document, name)?;

        fs::write(path, document.to_string())
            .await
            .with_context(|| format!("cannot write config file: {}", path.display()))?;
        Ok(())
    }

    fn set_theme(document: &mut DocumentMut, name: &str) -> Result<()> {
        if name.parse::<Theme>().is_err() {
            bail!(r#"unknown theme "{name}" (expected classic or powerline)"#);
        }

        document["theme"] = value(name);
        Ok(())
    }

    fn ensure_user_config(&self) -> Result<PathBuf> {
        let path = self
            .user_config_path()
            .ok_or_else(|| anyhow!("cannot determine user config path"))?;

        if !path.exists() {
            Self::create_default_config(CreateConfigOptions {
                target_path: Some(&path),
                ..Default::default()
            })?;
        }

        Ok(path)
    }

    fn default_template() -> Result<DocumentMut> {
        let rendered = toml_edit::ser::to_string_pretty(&Config::default())
            .context("cannot render default configuration")?;
        rendered
            .parse::<DocumentMut>()
            .context("default configuration template is not valid TOML")
    }

    async fn read_config(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read config file: {}", path.display()))?;
        let mut config: Config = toml_edit::de::from_str(&raw)
            .with_context(|| format!("config file is not valid TOML: {}", path.display()))?;
        config.normalize();
        Ok(config)
    }
}
