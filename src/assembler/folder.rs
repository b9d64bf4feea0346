// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A [`TourBackend`] persisting every tour in one `tours.json` inside a directory.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::backend::{BackendError, TourBackend, TourRecords};
use super::payload::{
    AckResponse, CreateTourResponse, FetchedTour, SaveTourRequest, TourSummary,
    UpdateOverlaysRequest,
};
use crate::model::TourId;

pub const TOURS_FILE: &str = "tours.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without syncing.
    #[default]
    BestEffort,

    /// Also syncs the file contents and, on unix, the directory entry.
    Durable,
}

#[derive(Debug)]
pub struct FolderBackend {
    root: PathBuf,
    durability: WriteDurability,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FolderBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
            lock: Mutex::new(()),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tours_path(&self) -> PathBuf {
        self.root.join(TOURS_FILE)
    }

    /// Reads the tour table. A missing file is an empty table.
    pub async fn read_records(&self) -> Result<TourRecords, BackendError> {
        let path = self.tours_path();
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(TourRecords::new()),
            Err(source) => return Err(BackendError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| BackendError::Json { path, source })
    }

    async fn write_records(&self, records: &TourRecords) -> Result<(), BackendError> {
        let path = self.tours_path();
        let mut contents = serde_json::to_vec_pretty(records).map_err(|source| {
            BackendError::Json {
                path: path.clone(),
                source,
            }
        })?;
        contents.push(b'\n');
        write_atomic(&self.root, &path, &contents, self.durability).await
    }

    async fn modify<T: Send>(
        &self,
        f: impl FnOnce(&mut TourRecords) -> T + Send,
    ) -> Result<T, BackendError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        let before = records.clone();
        let out = f(&mut records);
        if records != before {
            self.write_records(&records).await?;
        }
        Ok(out)
    }
}

#[async_trait]
impl TourBackend for FolderBackend {
    async fn create_tour(
        &self,
        request: SaveTourRequest,
    ) -> Result<CreateTourResponse, BackendError> {
        self.modify(|records| records.create(&request)).await
    }

    async fn fetch_tour(&self, tour_id: TourId) -> Result<FetchedTour, BackendError> {
        let _guard = self.lock.lock().await;
        self.read_records()
            .await?
            .fetch(tour_id)
            .cloned()
            .ok_or(BackendError::TourNotFound { tour_id })
    }

    async fn update_overlays(
        &self,
        request: UpdateOverlaysRequest,
    ) -> Result<AckResponse, BackendError> {
        self.modify(|records| records.update(&request)).await
    }

    async fn delete_tour(&self, tour_id: TourId) -> Result<(), BackendError> {
        let removed = self.modify(|records| records.delete(tour_id)).await?;
        tracing::debug!(%tour_id, removed, "tour deleted");
        Ok(())
    }

    async fn list_tours(&self) -> Result<Vec<TourSummary>, BackendError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_records().await?.summaries())
    }
}

async fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to).await;
                fs::rename(from, to).await
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to).await
    }
}

async fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), BackendError> {
    fs::create_dir_all(root)
        .await
        .map_err(|source| BackendError::Io {
            path: root.to_path_buf(),
            source,
        })?;

    match fs::symlink_metadata(path).await {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(BackendError::Io {
                path: path.to_path_buf(),
                source: io::Error::other("refusing to replace a symlink"),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(BackendError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(BackendError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = root.join(format!(
        ".tourgraph.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .await
        .map_err(|source| BackendError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    let written = async {
        file.write_all(contents).await?;
        file.flush().await?;
        if durability == WriteDurability::Durable {
            file.sync_all().await?;
        }
        Ok::<(), io::Error>(())
    }
    .await;
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(BackendError::Io {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = rename_overwrite(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(BackendError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(root).await.map_err(|source| BackendError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            dir.sync_all().await.map_err(|source| BackendError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
