//! Owner of the loaded resource archives
//!
//! A [`ResourceContext`] holds at most one resource blob and one archive
//! chain. Loading either releases the previous instance first; releasing
//! drops it and closes its streams. The context takes `&mut self` for every
//! load and release, so callers sharing it across threads must wrap it in
//! their own lock.

use crate::blob::ResourceBlob;
use crate::chain::{ArchiveChain, ArchiveTable};
use crate::config::StorageConfig;
use crate::resolver::{ArchiveResolver, ArchiveSource, DirectorySource};
use crate::{Result, StorageError};
use tracing::debug;
use wadkit_formats::LumpEntry;

/// Loaded resource archives and their configuration
pub struct ResourceContext<S: ArchiveSource = DirectorySource> {
    config: StorageConfig,
    resolver: ArchiveResolver<S>,
    blob: Option<ResourceBlob>,
    chain: Option<ArchiveChain<S::Reader>>,
}

impl ResourceContext<DirectorySource> {
    /// Context reading archives from the configured game directory
    pub fn new(config: StorageConfig) -> Self {
        let resolver = ArchiveResolver::from_config(&config);
        Self::with_resolver(config, resolver)
    }
}

impl<S: ArchiveSource> ResourceContext<S> {
    /// Context reading archives from `source`
    pub fn with_source(config: StorageConfig, source: S) -> Self {
        let resolver = ArchiveResolver::new(source, &config);
        Self::with_resolver(config, resolver)
    }

    fn with_resolver(config: StorageConfig, resolver: ArchiveResolver<S>) -> Self {
        Self {
            config,
            resolver,
            blob: None,
            chain: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Load the mandatory resource archive, replacing any loaded one.
    ///
    /// Any failure is unrecoverable, see [`StorageError::is_unrecoverable`].
    pub fn load_blob(&mut self) -> Result<&ResourceBlob> {
        self.release_blob();

        let path = self.config.blob_path();
        let data = self
            .resolver
            .source()
            .read(&self.config.blob_filename)
            .map_err(|e| StorageError::MandatoryResource {
                path: path.clone(),
                reason: format!(
                    "{e}. Check that {} contains {}",
                    self.config.base_path.display(),
                    self.config.blob_filename
                ),
            })?;

        let blob = ResourceBlob::from_bytes(path, data, self.config.sanitize_blob)?;
        Ok(self.blob.insert(blob))
    }

    /// Loaded resource archive
    pub fn blob(&self) -> Option<&ResourceBlob> {
        self.blob.as_ref()
    }

    /// Drop the resource archive
    pub fn release_blob(&mut self) {
        if let Some(blob) = self.blob.take() {
            debug!("Releasing {}", blob.path().display());
        }
    }

    /// Look up a lump in the resource archive by name
    pub fn find_in_blob_by_name(&self, name: impl AsRef<[u8]>) -> Result<Option<&[u8]>> {
        Ok(self.loaded_blob()?.find_by_name(name))
    }

    /// Look up a lump in the resource archive by directory position
    pub fn find_in_blob_by_index(&self, index: usize) -> Result<&[u8]> {
        self.loaded_blob()?.find_by_index(index)
    }

    fn loaded_blob(&self) -> Result<&ResourceBlob> {
        self.blob
            .as_ref()
            .ok_or(StorageError::NotLoaded("resource blob"))
    }

    /// Build an archive chain from a `;` separated list, replacing any
    /// loaded chain
    pub fn load_chain(&mut self, list: &str) -> &mut ArchiveChain<S::Reader> {
        self.release_chain();
        let chain = ArchiveChain::load(&self.resolver, list);
        self.chain.insert(chain)
    }

    /// Loaded archive chain
    pub fn chain(&self) -> Option<&ArchiveChain<S::Reader>> {
        self.chain.as_ref()
    }

    /// Loaded archive chain, for reading lumps
    pub fn chain_mut(&mut self) -> Option<&mut ArchiveChain<S::Reader>> {
        self.chain.as_mut()
    }

    /// Look up a lump across the archive chain
    pub fn find_in_chain(
        &self,
        name: impl AsRef<[u8]>,
    ) -> Option<(&LumpEntry, &ArchiveTable<S::Reader>)> {
        self.chain.as_ref()?.find(name)
    }

    /// Close every chain archive and drop the chain
    pub fn release_chain(&mut self) {
        if let Some(mut chain) = self.chain.take() {
            debug!("Releasing archive chain of {} archives", chain.len());
            chain.release();
        }
    }
}
