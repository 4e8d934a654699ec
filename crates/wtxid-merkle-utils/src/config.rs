//! Configuration read from the environment.
//!
//! Every field can be set through a variable prefixed with
//! [`Config::PREFIX`], e.g. `WTXID_MERKLE_UTILS_FORMAT=json`. `RUST_LOG` is
//! also honored for the `log` field.

use figment::{
    providers::{
        Env,
        Serialized,
    },
    Figment,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Display,
    Json,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Filter directives for the log output written to stderr.
    pub log: String,
    /// The output format used when a command is not given `--format`.
    pub format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: "info".to_string(),
            format: Format::Display,
        }
    }
}

impl Config {
    pub const PREFIX: &'static str = "WTXID_MERKLE_UTILS_";

    /// Reads the config from the environment, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if a variable carries an invalid value or if an
    /// unknown variable with [`Config::PREFIX`] is set.
    pub fn get() -> Result<Self, figment::Error> {
        Self::get_with_prefix(Self::PREFIX)
    }

    fn get_with_prefix(prefix: &str) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("RUST_").split("_").only(&["log"]))
            .merge(Env::prefixed(prefix))
            .extract()
    }
}
