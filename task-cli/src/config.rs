use serde::{Deserialize, Serialize};
use std::path::Path;
use todo_list::Priority;

pub const ENV_PREFIX: &str = "TASK_CLI";

/// Presentation defaults for a session.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    /// Priority used when `add` is given no `--priority`.
    #[serde(default)]
    pub default_priority: Priority,
    /// New tasks are due this many days from today unless `--due` or
    /// `--no-due` is given.
    #[serde(default = "default_due_in_days")]
    pub default_due_in_days: u32,
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_priority: Priority::default(),
            default_due_in_days: default_due_in_days(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional TOML file, then `TASK_CLI_*`
    /// environment variables. Later sources win.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

fn default_due_in_days() -> u32 {
    7
}

fn default_log_filter() -> String {
    "warn".to_string()
}
