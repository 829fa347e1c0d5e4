use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};

use crate::error::{QqError, QqResult};

/// Limits applied by the reduction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Reclassifications allowed at one position before giving up on an
    /// unquote chain.
    #[serde(default = "default_max_unquote_chain")]
    pub max_unquote_chain: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Bound on each awaited source. Async reduction only.
    #[serde(default, with = "duration_ms_opt")]
    pub resolution_timeout: Option<Duration>,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            max_unquote_chain: default_max_unquote_chain(),
            max_depth: default_max_depth(),
            resolution_timeout: None,
        }
    }
}

impl ReductionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> QqResult<Self> {
        let file = File::open(path)
            .map_err(|e| QqError::Config(format!("Failed to open config file: {}", e)))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| QqError::Config(format!("Failed to parse config file: {}", e)))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> QqResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| QqError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn with_resolution_timeout(mut self, timeout: Duration) -> Self {
        self.resolution_timeout = Some(timeout);
        self
    }
}

fn default_max_unquote_chain() -> usize {
    64
}

fn default_max_depth() -> usize {
    128
}

// Optional durations travel as milliseconds.
mod duration_ms_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
