use anyhow::{bail, Context, Result};
use std::{collections::BTreeSet, fs, path::Path, path::PathBuf};

/// Read side of bookmark persistence. The schedule only ever reads the set.
pub trait BookmarkStore {
    fn all(&self) -> Result<BTreeSet<i64>>;

    fn contains(&self, id: i64) -> Result<bool> {
        Ok(self.all()?.contains(&id))
    }
}

/// Bookmarked event ids kept as a JSON array in a single file.
pub struct JsonBookmarks {
    path: PathBuf,
}

impl JsonBookmarks {
    pub fn new(path: &Path) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }

    fn write(&self, ids: &BTreeSet<i64>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Error creating `{}`", parent.display()))?;
        }
        fs::write(
            &self.path,
            serde_json::to_string(ids).context("Error serializing bookmarks")?,
        )
        .with_context(|| format!("Error writing to `{}`", self.path.display()))
    }

    pub fn add(&self, id: i64) -> Result<()> {
        let mut ids = self.all()?;
        if !ids.insert(id) {
            log::info!("Event {} is already bookmarked", id);
            return Ok(());
        }
        self.write(&ids)?;
        log::info!("Bookmarked event {}", id);
        Ok(())
    }

    pub fn remove(&self, id: i64) -> Result<()> {
        let mut ids = self.all()?;
        if !ids.remove(&id) {
            bail!("Event {} is not bookmarked", id);
        }
        self.write(&ids)?;
        log::info!("Removed bookmark for event {}", id);
        Ok(())
    }
}

impl BookmarkStore for JsonBookmarks {
    fn all(&self) -> Result<BTreeSet<i64>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        serde_json::from_str(
            &fs::read_to_string(&self.path)
                .with_context(|| format!("Error reading `{}`", self.path.display()))?,
        )
        .context("Error deserializing bookmarks")
    }
}
