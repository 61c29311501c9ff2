use std::path::PathBuf;
use std::sync::Arc;

use formats::{ExtractError, GeoLayer};
use layers::ProjectedGeometry;

/// Monotonic tag carried by every dispatched load or projection.
///
/// Only the completion whose generation matches the most recent dispatch is
/// applied; anything older has been superseded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationCounter {
    next: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> Generation {
        let generation = Generation(self.next);
        self.next = self.next.wrapping_add(1);
        generation
    }
}

/// Read, extract and project `path` at `width` x `height`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub generation: Generation,
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
}

/// Re-project an already extracted layer; the source is not read again.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRequest {
    pub generation: Generation,
    pub layer: Arc<GeoLayer>,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub layer: Arc<GeoLayer>,
    pub projection: ProjectedGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Io { path: String, message: String },
    Extract(ExtractError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, message } => write!(f, "read file {path}: {message}"),
            LoadError::Extract(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Extract(e) => Some(e),
            LoadError::Io { .. } => None,
        }
    }
}

impl From<ExtractError> for LoadError {
    fn from(e: ExtractError) -> Self {
        LoadError::Extract(e)
    }
}

/// The single result delivered for one dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCompletion {
    pub generation: Generation,
    pub outcome: Result<Loaded, LoadError>,
}

#[cfg(test)]
mod tests {
    use super::{Generation, GenerationCounter, LoadError};
    use formats::ExtractError;

    #[test]
    fn generations_increase() {
        let mut counter = GenerationCounter::new();
        let a = counter.next();
        let b = counter.next();
        assert_eq!(a, Generation(0));
        assert!(b > a);
    }

    #[test]
    fn load_error_messages() {
        let io = LoadError::Io {
            path: "world.geojson".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            io.to_string(),
            "read file world.geojson: No such file or directory"
        );
        assert_eq!(
            LoadError::from(ExtractError::NoGeometry).to_string(),
            "bounding box could not be calculated"
        );
    }
}
