use std::path::Path;

/// Where document bytes come from.
///
/// The pipeline only needs whole-file reads; an I/O failure becomes a load
/// failure for that one request.
pub trait ByteSource: Send + Sync {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads straight from the local filesystem.
#[derive(Debug, Default, Copy, Clone)]
pub struct FileSource;

impl ByteSource for FileSource {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for std::sync::Arc<S> {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        (**self).read(path)
    }
}
