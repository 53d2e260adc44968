//! Layered configuration for docsift.
//!
//! Sources are merged in order, later sources overriding earlier ones:
//!
//! 1. Built-in defaults,
//! 2. `config.toml` in the user's configuration directory,
//! 3. `docsift.toml` in the working directory,
//! 4. a file given explicitly on the command line (TOML, YAML or JSON), and
//! 5. `DOCSIFT_*` environment variables, with `__` separating nested keys
//!    (`DOCSIFT_SEARCH__LIMIT=5`).

mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use docsift_index::models::Category;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub use crate::error::{Error, ErrorKind, Result};

pub const APPLICATION: &str = "docsift";
pub const ENV_PREFIX: &str = "DOCSIFT_";
pub const LOCAL_FILE: &str = "docsift.toml";
pub const MIN_SNIPPET_WIDTH: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Index to use when a command isn't given one
    pub index: Option<PathBuf>,
    pub search: SearchConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of hits to show
    pub limit: usize,
    /// Width of text snippets, in characters
    pub snippet_width: usize,
    /// Categories searched when none are given; empty means all
    pub categories: Vec<Category>,
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 10, snippet_width: 80, categories: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Where the documentation is hosted; record locations are relative to it
    pub base_url: Option<String>,
}

impl Config {
    /// Loads and validates the configuration from every source.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(explicit)?)
    }

    /// Builds the layered provider without extracting it.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dirs) = ProjectDirs::from("", "", APPLICATION) {
            let user = dirs.config_dir().join("config.toml");
            tracing::debug!(path = %user.display(), "user configuration");
            figment = figment.merge(Toml::file(user));
        }
        figment = figment.merge(Toml::file(LOCAL_FILE));
        if let Some(path) = explicit {
            figment = figment.merge(explicit_file(path)?);
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.limit == 0 {
            exn::bail!(ErrorKind::Invalid("search.limit must be at least 1".to_string()));
        }
        if self.search.snippet_width < MIN_SNIPPET_WIDTH {
            exn::bail!(ErrorKind::Invalid(format!("search.snippet_width must be at least {MIN_SNIPPET_WIDTH}")));
        }
        if self.site.base_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("site.base_url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Explicitly requested files must exist; their format follows the extension.
fn explicit_file(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.display().to_string()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    let figment = match extension.as_deref() {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => exn::bail!(ErrorKind::Invalid(format!("unsupported configuration format: {}", path.display()))),
    };
    Ok(figment)
}
