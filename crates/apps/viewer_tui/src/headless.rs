use std::path::Path;

use layers::render_text;
use runtime::{Generation, LoadError, LoadRequest};
use streaming::{ByteSource, Pipeline};

/// Extract, project and rasterize `path` once.
pub fn render_once<S: ByteSource>(
    source: S,
    path: &Path,
    width: usize,
    height: usize,
) -> Result<String, LoadError> {
    let pipeline = Pipeline::new(source);
    let done = pipeline.load(&LoadRequest {
        generation: Generation(0),
        path: path.to_path_buf(),
        width,
        height,
    });
    let loaded = done.outcome?;
    Ok(render_text(&loaded.projection))
}
