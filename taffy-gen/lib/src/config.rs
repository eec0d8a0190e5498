//! Generator configuration.
//!
//! A [`GeneratorConfig`] is read from an optional TOML file and then
//! overridden by whatever the command line supplies. Every field has a
//! default except the service name, which must be present once both
//! sources are merged.
//!
//! ```toml
//! service_name = "HelpdeskApi"
//! exclude = ["internalStats"]
//! extensions = ["cfc"]
//! interfaces_file = "taffy-typescript-client-interfaces.ts"
//! client_file = "taffy-typescript-client.ts"
//! patch_fields_optional = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::EmitOptions;
use crate::error::ConfigError;
use crate::naming::is_identifier;

pub const DEFAULT_INTERFACES_FILE: &str = "taffy-typescript-client-interfaces.ts";
pub const DEFAULT_CLIENT_FILE: &str = "taffy-typescript-client.ts";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Name of the generated service class.
    pub service_name: Option<String>,
    /// Endpoints that are registered on the client but get no type declaration.
    pub exclude: Vec<String>,
    /// Source file extensions to consider, compared ignoring ASCII case.
    pub extensions: Vec<String>,
    pub interfaces_file: String,
    pub client_file: String,
    /// Make every data field of a `patch` operation optional.
    pub patch_fields_optional: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            service_name: None,
            exclude: Vec::new(),
            extensions: vec!["cfc".to_string()],
            interfaces_file: DEFAULT_INTERFACES_FILE.to_string(),
            client_file: DEFAULT_CLIENT_FILE.to_string(),
            patch_fields_optional: true,
        }
    }
}

impl GeneratorConfig {
    /// Parses a TOML document; absent keys keep their defaults.
    ///
    /// ## Examples
    ///
    /// ```
    /// use taffy_gen_lib::config::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::from_toml_str(r#"
    ///     service_name = "HelpdeskApi"
    ///     exclude = ["internal"]
    /// "#).unwrap();
    ///
    /// assert_eq!(config.service_name.as_deref(), Some("HelpdeskApi"));
    /// assert_eq!(config.extensions, vec!["cfc"]);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Replaces the service name when the caller supplies one.
    pub fn with_service_name(mut self, name: Option<String>) -> Self {
        if name.is_some() {
            self.service_name = name;
        }
        self
    }

    /// Adds endpoint names to the exclusion list, skipping ones already there.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.exclude.contains(&name) {
                self.exclude.push(name);
            }
        }
        self
    }

    /// Checks the merged configuration and returns the service name.
    pub fn validate(&self) -> Result<&str, ConfigError> {
        let service_name = self
            .service_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingServiceName)?;

        if !is_identifier(service_name) {
            return Err(ConfigError::InvalidServiceName(service_name.to_string()));
        }

        for file in [&self.interfaces_file, &self.client_file] {
            if !is_bare_file_name(file) {
                return Err(ConfigError::InvalidOutputFile(file.clone()));
            }
        }

        if self.interfaces_file == self.client_file {
            return Err(ConfigError::OutputCollision(self.client_file.clone()));
        }

        Ok(service_name)
    }

    /// Whether `name` is on the exclusion list.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|excluded| excluded == name)
    }

    /// Whether `path` has one of the configured source extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
    }

    /// Module specifier the client file uses to import the interfaces file.
    ///
    /// ## Examples
    ///
    /// ```
    /// use taffy_gen_lib::config::GeneratorConfig;
    ///
    /// assert_eq!(
    ///     GeneratorConfig::default().interfaces_module(),
    ///     "./taffy-typescript-client-interfaces"
    /// );
    /// ```
    pub fn interfaces_module(&self) -> String {
        let stem = self
            .interfaces_file
            .strip_suffix(".d.ts")
            .or_else(|| self.interfaces_file.strip_suffix(".ts"))
            .unwrap_or(&self.interfaces_file);
        format!("./{stem}")
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            patch_fields_optional: self.patch_fields_optional,
        }
    }
}

fn is_bare_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
}
