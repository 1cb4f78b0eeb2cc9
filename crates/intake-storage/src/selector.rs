//! Resolution of logical locations to concrete filesystems.

use std::sync::Arc;

use intake_core::Location;

use crate::traits::Filesystem;

/// Selector over the writable storage areas of an installation.
pub trait Filesystems: Send + Sync {
    /// Persistent, non-public storage
    fn storage(&self) -> Arc<dyn Filesystem>;

    /// Publicly served web area
    fn web(&self) -> Arc<dyn Filesystem>;

    /// Installation customizing area
    fn customizing(&self) -> Arc<dyn Filesystem>;

    fn select(&self, location: Location) -> Arc<dyn Filesystem> {
        match location {
            Location::Storage => self.storage(),
            Location::Web => self.web(),
            Location::Customizing => self.customizing(),
        }
    }
}

/// The three storage areas, each backed by its own filesystem.
#[derive(Clone)]
pub struct FilesystemSet {
    storage: Arc<dyn Filesystem>,
    web: Arc<dyn Filesystem>,
    customizing: Arc<dyn Filesystem>,
}

impl FilesystemSet {
    pub fn new(
        storage: Arc<dyn Filesystem>,
        web: Arc<dyn Filesystem>,
        customizing: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            storage,
            web,
            customizing,
        }
    }
}

impl Filesystems for FilesystemSet {
    fn storage(&self) -> Arc<dyn Filesystem> {
        self.storage.clone()
    }

    fn web(&self) -> Arc<dyn Filesystem> {
        self.web.clone()
    }

    fn customizing(&self) -> Arc<dyn Filesystem> {
        self.customizing.clone()
    }
}

#[cfg(all(test, feature = "storage-memory"))]
mod tests {
    use super::*;
    use crate::MemoryFilesystem;
    use std::io::Cursor;

    #[tokio::test]
    async fn select_routes_each_location_to_its_filesystem() {
        let storage = MemoryFilesystem::new();
        let web = MemoryFilesystem::new();
        let customizing = MemoryFilesystem::new();
        let set = FilesystemSet::new(
            Arc::new(storage.clone()),
            Arc::new(web.clone()),
            Arc::new(customizing.clone()),
        );

        for (location, name) in [
            (Location::Storage, "s.txt"),
            (Location::Web, "w.txt"),
            (Location::Customizing, "c.txt"),
        ] {
            set.select(location)
                .write_stream(name, Box::new(Cursor::new(b"x".to_vec())))
                .await
                .unwrap();
        }

        assert_eq!(storage.paths(), vec!["s.txt".to_string()]);
        assert_eq!(web.paths(), vec!["w.txt".to_string()]);
        assert_eq!(customizing.paths(), vec!["c.txt".to_string()]);
    }
}
