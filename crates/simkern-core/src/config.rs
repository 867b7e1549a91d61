//! Dispatch configuration.
//!
//! Sources are layered with `figment`, later ones overriding earlier ones:
//!
//! 1. Built-in defaults (auto-detect, nothing disabled)
//! 2. A TOML file (`simkern.toml` in the working directory, or an explicit path)
//! 3. `SIMKERN_`-prefixed environment variables
//!
//! ```toml
//! force_isa = "avx2"
//! disabled_isas = ["avx512"]
//! ```
//!
//! Environment values use the same bracketed list syntax for `disabled_isas`.
//! A bare name such as `SIMKERN_DISABLED_ISAS=avx512` is a string, not a list,
//! and fails to load.
//!
//! ```sh
//! SIMKERN_FORCE_ISA=serial
//! SIMKERN_DISABLED_ISAS=[avx512,neon]
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dispatch::Isa;
use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "simkern.toml";

/// Prefix of environment overrides (`SIMKERN_FORCE_ISA=avx2`,
/// `SIMKERN_DISABLED_ISAS=[avx512]`).
pub const ENV_PREFIX: &str = "SIMKERN_";

/// Controls which kernel family the registry hands out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Use exactly this ISA; resolution fails if it cannot serve a metric.
    pub force_isa: Option<Isa>,
    /// ISAs never selected during automatic resolution.
    pub disabled_isas: Vec<Isa>,
}

impl DispatchConfig {
    /// Configuration that always resolves to `isa`.
    #[must_use]
    pub fn forced(isa: Isa) -> Self {
        Self {
            force_isa: Some(isa),
            disabled_isas: Vec::new(),
        }
    }

    /// Loads defaults, then `simkern.toml` if present, then the environment.
    pub fn load() -> Result<Self> {
        Self::extract(Self::base().merge(Toml::file(CONFIG_FILE)))
    }

    /// Like [`DispatchConfig::load`] but reads `path`, which must exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Config(format!(
                "config file '{}' not found",
                path.display()
            )));
        }
        debug!(path = %path.display(), "Loading dispatch config");
        Self::extract(Self::base().merge(Toml::file(path)))
    }

    /// Parses a TOML document on top of the defaults (no environment).
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = Self::base().merge(Toml::string(toml)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that could leave a metric without a kernel.
    pub fn validate(&self) -> Result<()> {
        if self.is_disabled(Isa::Serial) {
            return Err(Error::Config(
                "the serial ISA cannot be disabled".to_string(),
            ));
        }
        if let Some(isa) = self.force_isa {
            if self.is_disabled(isa) {
                return Err(Error::Config(format!(
                    "force_isa = {isa} is also listed in disabled_isas"
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` if automatic resolution must skip `isa`.
    #[must_use]
    pub fn is_disabled(&self, isa: Isa) -> bool {
        self.disabled_isas.contains(&isa)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        debug!(
            force_isa = ?config.force_isa,
            disabled_isas = ?config.disabled_isas,
            "Dispatch config loaded"
        );
        Ok(config)
    }
}
