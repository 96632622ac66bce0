use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Buffer size handed to remove operations by the console.
pub const DEFAULT_BUF_SIZE: usize = 1024;

/// Limits applied to every queue created from this config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of elements a queue may hold, `None` for no limit.
    pub node_limit: Option<usize>,
    /// Longest value, in bytes, an insert may copy.
    pub value_limit: Option<usize>,
    pub buf_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_limit: None,
            value_limit: None,
            buf_size: DEFAULT_BUF_SIZE,
        }
    }
}

impl Config {
    /// Load a JSON config file, fields left out keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;

        Ok(config)
    }

    /// Build a config from `LINKQ_NODE_LIMIT`, `LINKQ_VALUE_LIMIT` and
    /// `LINKQ_BUF_SIZE`, anything missing or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| var(key).and_then(|v| v.trim().parse::<usize>().ok());

        let buf_size = parse("LINKQ_BUF_SIZE")
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_BUF_SIZE);

        Self {
            node_limit: parse("LINKQ_NODE_LIMIT"),
            value_limit: parse("LINKQ_VALUE_LIMIT"),
            buf_size,
        }
    }
}
