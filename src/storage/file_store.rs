// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON-lines appointment store
//!
//! Appends one `StoredAppointment` per line to a local file. Reads and writes
//! are serialized through a mutex so concurrent requests never interleave
//! lines. Only newline-terminated lines count as records: an unterminated tail
//! left by an interrupted write is skipped on read and cut off by the next save.

use super::{AppointmentFilter, AppointmentRecord, Store, StoreAck, StoreError, StoredAppointment};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) the store file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        info!("📂 Appointment file store opened at {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Caller must hold `write_lock`
    async fn read_all(&self) -> Result<Vec<StoredAppointment>, StoreError> {
        let contents = fs::read(&self.path).await?;
        let committed = committed_prefix(&contents);
        if committed.len() < contents.len() {
            debug!(
                "Skipping {} bytes of unterminated record in {}",
                contents.len() - committed.len(),
                self.path.display()
            );
        }

        committed
            .split(|b| *b == b'\n')
            .enumerate()
            .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
            .map(|(idx, line)| {
                serde_json::from_slice(line).map_err(|e| StoreError::CorruptRecord {
                    line: idx + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Length of the file up to and including its last newline
    async fn committed_len(&self, file: &mut File) -> Result<u64, StoreError> {
        let len = file.metadata().await?.len();
        if len == 0 {
            return Ok(0);
        }
        file.seek(SeekFrom::End(-1)).await?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last).await?;
        if last[0] == b'\n' {
            return Ok(len);
        }
        let contents = fs::read(&self.path).await?;
        Ok(committed_prefix(&contents).len() as u64)
    }
}

fn committed_prefix(contents: &[u8]) -> &[u8] {
    match contents.iter().rposition(|b| *b == b'\n') {
        Some(idx) => &contents[..=idx],
        None => &[],
    }
}

async fn append_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await?;
    file.sync_data().await
}

#[async_trait]
impl Store for JsonFileStore {
    async fn save(&self, record: AppointmentRecord) -> Result<StoreAck, StoreError> {
        let stored = StoredAppointment {
            id: Uuid::new_v4().to_string(),
            record,
        };
        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        let committed = self.committed_len(&mut file).await?;
        let len = file.metadata().await?.len();
        if committed < len {
            warn!(
                "Truncating {} bytes of unterminated record in {}",
                len - committed,
                self.path.display()
            );
            file.set_len(committed).await?;
        }

        if let Err(e) = append_line(&mut file, line.as_bytes()).await {
            if let Err(trunc) = file.set_len(committed).await {
                warn!("Failed to roll back partial write: {}", trunc);
            }
            return Err(e.into());
        }

        debug!("📥 Appointment {} appended to {}", stored.id, self.path.display());
        Ok(StoreAck { id: stored.id })
    }

    async fn query(&self, filter: AppointmentFilter) -> Result<Vec<StoredAppointment>, StoreError> {
        let records = {
            let _guard = self.write_lock.lock().await;
            self.read_all().await?
        };
        Ok(filter.apply(records.iter()))
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
