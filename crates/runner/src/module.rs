use std::path::{Path, PathBuf};

use log::debug;

use crate::{Error, Result};

/// The raw bytes of a WebAssembly module
#[derive(Debug, Clone)]
pub struct WasmModule {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl WasmModule {
    /// Read a module from disk.
    ///
    /// Nothing is validated here; a file that exists but holds garbage is only
    /// rejected by [`crate::Instance::new`].
    /// With the `wat` feature, files ending in `.wat` are assembled from text.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::FileRead { path: path.to_path_buf(), source })?;
        debug!("read {} bytes from {}", bytes.len(), path.display());

        #[cfg(feature = "wat")]
        let bytes = match path.extension().is_some_and(|ext| ext == "wat") {
            true => wat::parse_bytes(&bytes).map_err(crate::InstantiationError::from)?.into_owned(),
            false => bytes,
        };

        Ok(Self { path: Some(path.to_path_buf()), bytes })
    }

    /// Wrap bytes that are already in memory
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { path: None, bytes: bytes.into() }
    }

    /// The path the module was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The binary module
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
