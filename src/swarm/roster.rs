use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult, SwarmError};

/// A remote load-generating agent.
///
/// `index` only orders workers in logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worker {
    pub index: usize,
    pub address: String,
}

/// Source of the workers taking part in an attack.
#[async_trait]
pub trait WorkerRoster: Send + Sync {
    /// Returns the workers in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn resolve(&self) -> AppResult<Vec<Worker>>;
}

/// Workers listed up front (CLI flags or config file).
pub struct StaticRoster {
    addresses: Vec<String>,
}

impl StaticRoster {
    #[must_use]
    pub const fn new(addresses: Vec<String>) -> Self {
        Self { addresses }
    }
}

#[async_trait]
impl WorkerRoster for StaticRoster {
    async fn resolve(&self) -> AppResult<Vec<Worker>> {
        Ok(workers_from_addresses(
            self.addresses.iter().map(String::as_str),
        ))
    }
}

/// Workers read from a text file, one address per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WorkerRoster for FileRoster {
    async fn resolve(&self) -> AppResult<Vec<Worker>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| {
                AppError::swarm(SwarmError::ReadRoster {
                    path: self.path.clone(),
                    source: err,
                })
            })?;
        let workers = workers_from_addresses(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        info!(
            "Read {} workers from the roster {}",
            workers.len(),
            self.path.display()
        );
        Ok(workers)
    }
}

pub(crate) fn workers_from_addresses<'addr>(
    addresses: impl IntoIterator<Item = &'addr str>,
) -> Vec<Worker> {
    addresses
        .into_iter()
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .enumerate()
        .map(|(index, address)| Worker {
            index,
            address: address.to_owned(),
        })
        .collect()
}
