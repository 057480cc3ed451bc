use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::{
    constants::WEEK_SECONDS,
    error::{Error, Result},
};

/// One votable gauge in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeRecord {
    #[serde(serialize_with = "checksummed")]
    pub address: Address,
    pub label: String,
    pub network: u64,
}

fn checksummed<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

/// Start of the week containing `timestamp`. Weeks start on Thursday 00:00 UTC.
pub fn epoch_start(timestamp: u64) -> u64 {
    timestamp / WEEK_SECONDS * WEEK_SECONDS
}

/// Epoch containing `time`. Fails for clocks set before 1970.
pub fn epoch_at(time: SystemTime) -> Result<u64> {
    let elapsed = time.duration_since(UNIX_EPOCH)?;
    Ok(epoch_start(elapsed.as_secs()))
}

pub fn current_epoch() -> Result<u64> {
    epoch_at(SystemTime::now())
}

/// JSON array indented by four spaces.
pub fn render(records: &[GaugeRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

pub fn snapshot_path(out_dir: &Path, epoch: u64) -> PathBuf {
    out_dir.join(format!("gauge_choices-{epoch}.json"))
}

pub fn latest_path(out_dir: &Path) -> PathBuf {
    out_dir.join("gauge_choices-latest.json")
}

/// Writes the epoch snapshot, and the `latest` alias when asked to. Returns the written paths.
pub fn write_snapshot(
    out_dir: &Path,
    epoch: u64,
    records: &[GaugeRecord],
    write_latest: bool,
) -> Result<Vec<PathBuf>> {
    let content = render(records)?;
    fs::create_dir_all(out_dir).map_err(|source| Error::Output {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut paths = vec![snapshot_path(out_dir, epoch)];
    if write_latest {
        paths.push(latest_path(out_dir));
    }

    for path in &paths {
        fs::write(path, &content).map_err(|source| Error::Output {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), gauges = records.len(), "Wrote snapshot");
    }

    Ok(paths)
}
