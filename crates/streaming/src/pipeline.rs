use std::sync::Arc;

use formats::GeoLayer;
use layers::project_layer;
use runtime::{LoadCompletion, LoadError, LoadRequest, Loaded, ProjectRequest};
use tracing::{debug, warn};

use crate::io::ByteSource;

/// Executes load and projection requests synchronously.
///
/// A load reads the source and extracts a fresh [`GeoLayer`]; a projection
/// only re-runs the projector over the layer it is handed. Every call returns
/// exactly one [`LoadCompletion`] tagged with the request's generation.
#[derive(Debug, Clone)]
pub struct Pipeline<S> {
    source: S,
}

impl<S: ByteSource> Pipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load(&self, req: &LoadRequest) -> LoadCompletion {
        LoadCompletion {
            generation: req.generation,
            outcome: self.load_outcome(req),
        }
    }

    fn load_outcome(&self, req: &LoadRequest) -> Result<Loaded, LoadError> {
        let path = req.path.display().to_string();
        debug!(generation = req.generation.0, %path, "loading");

        let bytes = self.source.read(&req.path).map_err(|e| {
            warn!(%path, "read failed: {e}");
            LoadError::Io {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        let layer = GeoLayer::from_geojson_bytes(&bytes).map_err(|e| {
            warn!(%path, "extract failed: {e}");
            LoadError::Extract(e)
        })?;
        debug!(
            %path,
            bytes = bytes.len(),
            features = layer.features.len(),
            rings = layer.ring_count(),
            "extracted"
        );

        let layer = Arc::new(layer);
        let projection = project_layer(&layer, req.width, req.height);
        Ok(Loaded { layer, projection })
    }

    pub fn project(&self, req: &ProjectRequest) -> LoadCompletion {
        debug!(
            generation = req.generation.0,
            width = req.width,
            height = req.height,
            "projecting cached layer"
        );
        let projection = project_layer(&req.layer, req.width, req.height);
        LoadCompletion {
            generation: req.generation,
            outcome: Ok(Loaded {
                layer: Arc::clone(&req.layer),
                projection,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::Pipeline;
    use crate::io::ByteSource;
    use formats::ExtractError;
    use runtime::{Effect, LoadError, ViewportEvent, ViewportState};

    const SQUARE: &str = r#"{"features": [
        {"properties": {"name": "square"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,10],[10,10],[10,0],[0,0]]]}},
        {"properties": {"name": "ghost"}, "geometry": null}
    ]}"#;

    /// Serves one in-memory document and counts reads.
    struct Probe {
        doc: &'static str,
        reads: AtomicUsize,
    }

    impl Probe {
        fn new(doc: &'static str) -> Self {
            Self {
                doc,
                reads: AtomicUsize::new(0),
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ByteSource for Probe {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if path.ends_with("missing.geojson") {
                return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
            }
            Ok(self.doc.as_bytes().to_vec())
        }
    }

    /// Run every effect through the pipeline and feed the results back.
    fn drive(
        pipeline: &Pipeline<Probe>,
        mut state: ViewportState,
        event: ViewportEvent,
    ) -> ViewportState {
        let (next, effects) = state.update(event);
        state = next;
        for effect in effects {
            let done = match &effect {
                Effect::Load(req) => pipeline.load(req),
                Effect::Project(req) => pipeline.project(req),
                Effect::Quit => continue,
            };
            state = drive(pipeline, state, ViewportEvent::LoadCompleted(done));
        }
        state
    }

    #[test]
    fn resize_reprojects_without_reading_again() {
        let pipeline = Pipeline::new(Probe::new(SQUARE));
        let state = ViewportState::new(Some("square.geojson".into()));

        let state = drive(&pipeline, state, ViewportEvent::Resize { width: 80, height: 24 });
        assert_eq!(pipeline.source().reads(), 1);
        assert_eq!(state.projection.size(), (72, 16));
        assert_eq!(state.projection.polygons.len(), 1, "geometry-less feature skipped");

        let state = drive(&pipeline, state, ViewportEvent::Resize { width: 120, height: 50 });
        let state = drive(&pipeline, state, ViewportEvent::Resize { width: 40, height: 20 });
        assert_eq!(pipeline.source().reads(), 1);
        assert_eq!(state.projection.size(), (32, 12));

        let state = drive(&pipeline, state, ViewportEvent::Key(runtime::Key::Left));
        assert_eq!(pipeline.source().reads(), 1);
        assert_eq!(state.projection.size(), (31, 12));

        // Only an explicit reload goes back to the source.
        let state = drive(&pipeline, state, ViewportEvent::Key(runtime::Key::Char('r')));
        assert_eq!(pipeline.source().reads(), 2);
        assert_eq!(state.projection.size(), (31, 12));
    }

    #[test]
    fn square_corners_after_full_load() {
        let pipeline = Pipeline::new(Probe::new(SQUARE));
        let req = runtime::LoadRequest {
            generation: runtime::Generation(3),
            path: "square.geojson".into(),
            width: 11,
            height: 11,
        };
        let done = pipeline.load(&req);
        assert_eq!(done.generation, runtime::Generation(3));
        let loaded = done.outcome.expect("load");
        let ring = &loaded.projection.polygons[0].rings[0];
        let corners: Vec<(usize, usize)> = ring.iter().take(4).map(|p| (p.x, p.y)).collect();
        assert_eq!(corners, vec![(0, 10), (0, 0), (10, 0), (10, 10)]);
    }

    #[test]
    fn io_and_extract_failures_become_load_errors() {
        let pipeline = Pipeline::new(Probe::new(r#"{"features": []}"#));
        let mut req = runtime::LoadRequest {
            generation: runtime::Generation(0),
            path: "missing.geojson".into(),
            width: 20,
            height: 10,
        };
        assert!(matches!(
            pipeline.load(&req).outcome,
            Err(LoadError::Io { ref path, .. }) if path == "missing.geojson"
        ));

        req.path = "empty.geojson".into();
        assert_eq!(
            pipeline.load(&req).outcome,
            Err(LoadError::Extract(ExtractError::NoGeometry))
        );
    }

    #[test]
    fn failed_load_leaves_controller_interactive() {
        let pipeline = Pipeline::new(Probe::new(SQUARE));
        let state = ViewportState::new(Some("missing.geojson".into()));
        let state = drive(&pipeline, state, ViewportEvent::Resize { width: 80, height: 24 });
        assert!(state.last_error.is_some());
        assert!(state.projection.is_empty());
        assert!(!state.is_loading());

        let mut state = drive(&pipeline, state, ViewportEvent::Key(runtime::Key::Char('e')));
        state.edit_buffer = "square.geojson".into();
        let state = drive(&pipeline, state, ViewportEvent::Key(runtime::Key::Enter));
        assert_eq!(state.last_error, None);
        assert_eq!(state.projection.polygons.len(), 1);
    }
}
