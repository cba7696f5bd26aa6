//! Index Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SoundLibraryPort;
use crate::application::queries::{GetIndexReport, IndexEntry, IndexReport};
use crate::domain::sound::{SoundDirectory, SoundSource};

/// GetIndexReport Handler
pub struct IndexReportHandler {
    library: Arc<dyn SoundLibraryPort>,
    directories: Vec<SoundDirectory>,
}

impl IndexReportHandler {
    pub fn new(library: Arc<dyn SoundLibraryPort>, directories: Vec<SoundDirectory>) -> Self {
        Self {
            library,
            directories,
        }
    }

    pub async fn handle(&self, query: GetIndexReport) -> Result<IndexReport, ApplicationError> {
        let index = self.library.build_index(&self.directories).await?;

        let entries = index
            .assets()
            .into_iter()
            .map(|asset| IndexEntry {
                key: asset.key().to_string(),
                path: asset.path().to_path_buf(),
                source: asset.source(),
            })
            .collect();

        let collisions = if query.include_collisions {
            index.collisions().to_vec()
        } else {
            Vec::new()
        };

        Ok(IndexReport {
            entries,
            collisions,
            base_count: index.count_by_source(SoundSource::Base),
            custom_count: index.count_by_source(SoundSource::Custom),
        })
    }
}
