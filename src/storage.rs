use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShamirError};
use crate::vault::inspect;

/// Trait defining storage operations for encoded shares
///
/// Implement this trait to create custom storage backends. Stores hold the
/// base64 text produced by [`share`](crate::share); they never see secrets.
///
/// # Example
/// ```
/// use shamir_vault::ShareStore;
/// use std::collections::BTreeMap;
///
/// #[derive(Default)]
/// struct MemoryStore(BTreeMap<u8, String>);
///
/// impl ShareStore for MemoryStore {
///     fn store_share(&mut self, index: u8, share: &str) -> shamir_vault::Result<()> {
///         self.0.insert(index, share.to_owned());
///         Ok(())
///     }
///     fn load_share(&self, index: u8) -> shamir_vault::Result<String> {
///         self.0.get(&index).cloned().ok_or(shamir_vault::ShamirError::InvalidShareIndex(index))
///     }
///     fn list_shares(&self) -> shamir_vault::Result<Vec<u8>> {
///         Ok(self.0.keys().copied().collect())
///     }
///     fn delete_share(&mut self, index: u8) -> shamir_vault::Result<()> {
///         self.0.remove(&index);
///         Ok(())
///     }
/// }
/// ```
pub trait ShareStore {
    /// Stores an encoded share under its index
    fn store_share(&mut self, index: u8, share: &str) -> Result<()>;

    /// Retrieves an encoded share by index
    fn load_share(&self, index: u8) -> Result<String>;

    /// Lists all available share indices
    fn list_shares(&self) -> Result<Vec<u8>>;

    /// Deletes a share from storage
    fn delete_share(&mut self, index: u8) -> Result<()>;

    /// Stores every share of a split
    fn store_all(&mut self, shares: &BTreeMap<u8, String>) -> Result<()> {
        for (&index, share) in shares {
            self.store_share(index, share)?;
        }
        Ok(())
    }

    /// Loads every stored share
    fn load_all(&self) -> Result<BTreeMap<u8, String>> {
        self.list_shares()?
            .into_iter()
            .map(|index| -> Result<(u8, String)> { Ok((index, self.load_share(index)?)) })
            .collect()
    }
}

/// File system implementation of ShareStore
///
/// Stores each share as a separate text file containing its base64 encoding.
/// Files are named in the format: `share_<index>` (e.g., share_001, share_002)
///
/// Shares are checked structurally on the way in and out: a file whose
/// envelope index disagrees with its file name is rejected, which catches
/// shares copied into the wrong slot. Authentication still only happens in
/// [`recover`](crate::recover).
///
/// # Example
/// ```
/// use shamir_vault::{FileShareStore, ShareStore, share};
/// use tempfile::tempdir;
///
/// let temp_dir = tempdir().unwrap();
/// let mut store = FileShareStore::new(temp_dir.path()).unwrap();
///
/// let shares = share(b"stored secret", 2, 3).unwrap();
/// store.store_all(&shares).unwrap();
/// assert_eq!(store.load_share(2).unwrap(), shares[&2]);
/// ```
pub struct FileShareStore {
    /// Base directory for storing shares
    base_dir: PathBuf,
}

impl FileShareStore {
    /// Creates a new file-based store at specified path
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Gets the path for a share file
    fn share_path(&self, index: u8) -> PathBuf {
        self.base_dir.join(format!("share_{index:03}"))
    }
}

/// Rejects a share whose envelope does not carry the expected index
fn check_slot(index: u8, share: &str) -> Result<()> {
    if index == 0 {
        return Err(ShamirError::InvalidShareIndex(index));
    }
    if inspect(share)?.index != index {
        return Err(ShamirError::MalformedEnvelope(
            "share index does not match storage slot",
        ));
    }
    Ok(())
}

impl ShareStore for FileShareStore {
    fn store_share(&mut self, index: u8, share: &str) -> Result<()> {
        check_slot(index, share)?;
        let mut contents = share.trim().to_owned();
        contents.push('\n');
        fs::write(self.share_path(index), contents)?;
        Ok(())
    }

    fn load_share(&self, index: u8) -> Result<String> {
        let contents = fs::read_to_string(self.share_path(index)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ShamirError::InvalidShareIndex(index)
            } else {
                e.into()
            }
        })?;

        let share = contents.trim().to_owned();
        check_slot(index, &share)?;
        Ok(share)
    }

    fn list_shares(&self) -> Result<Vec<u8>> {
        let mut indices = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            if let Some(stripped) = file_name.strip_prefix("share_") {
                if let Ok(index) = stripped.parse::<u8>() {
                    if index != 0 {
                        indices.push(index);
                    }
                }
            }
        }

        indices.sort_unstable();
        Ok(indices)
    }

    fn delete_share(&mut self, index: u8) -> Result<()> {
        let path = self.share_path(index);
        fs::remove_file(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ShamirError::InvalidShareIndex(index)
            } else {
                e.into()
            }
        })?;
        Ok(())
    }
}
