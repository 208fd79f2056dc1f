use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};

use crate::{Error, InternalResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound on a single subscriber callback.
    #[serde(default = "default_delivery_timeout", with = "millis")]
    pub delivery_timeout: Duration,

    /// Capacity of the delivery failure broadcast channel.
    #[serde(default = "default_failure_buffer_size")]
    pub failure_buffer_size: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: default_delivery_timeout(),
            failure_buffer_size: default_failure_buffer_size(),
        }
    }
}

impl DispatcherConfig {
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    // JSONファイルからディスパッチャ設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }
}

fn default_delivery_timeout() -> Duration {
    Duration::from_millis(5000)
}

fn default_failure_buffer_size() -> usize {
    256
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path.as_ref()).map_err(|e| {
        Error::internal(format!(
            "Failed to open config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

/// Serde adapter storing a `Duration` as whole milliseconds.
pub mod millis {
    use serde::{ser, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).map_err(ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
