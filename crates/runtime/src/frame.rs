use layers::render_text;

use crate::viewport::ViewportState;

pub const TITLE: &str = "asciimap viewer";
pub const CALCULATING: &str = "Calculating viewport...";

const VIEW_HINTS: &str = "q: quit | r: reload | e: edit path | arrows/hjkl: resize";
const EDIT_HINTS: &str = "enter: open | esc: cancel | ctrl+u: clear | ctrl+c: quit";

/// Everything the presentation shell needs to draw one frame.
///
/// Built from a [`ViewportState`] alone; borders, colors and layout are the
/// shell's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub ready: bool,
    pub title: &'static str,
    /// Rasterized grid, or a placeholder text.
    pub canvas: String,
    pub status: String,
    /// Shown under the status line: the edit-mode error, if any.
    pub detail: Option<String>,
    pub footer: String,
    pub editing: bool,
    pub failed: bool,
}

impl FrameView {
    pub fn from_state(state: &ViewportState) -> Self {
        if !state.is_ready() && !state.editing {
            return Self {
                ready: false,
                title: TITLE,
                canvas: CALCULATING.to_string(),
                status: String::new(),
                detail: None,
                footer: String::new(),
                editing: false,
                failed: false,
            };
        }

        let canvas = if state.is_ready() {
            render_text(&state.projection)
        } else {
            CALCULATING.to_string()
        };

        if state.editing {
            return Self {
                ready: state.is_ready(),
                title: TITLE,
                canvas,
                status: format!("Path: {}_", state.edit_buffer),
                detail: state.last_error.as_ref().map(|e| e.to_string()),
                footer: EDIT_HINTS.to_string(),
                editing: true,
                failed: state.last_error.is_some(),
            };
        }

        let progress = if state.is_loading() { "Loading..." } else { "Loaded" };
        let footer = format!("{VIEW_HINTS} | {progress}");

        if let Some(err) = &state.last_error {
            return Self {
                ready: true,
                title: TITLE,
                canvas,
                status: format!("Failed to load: {err}"),
                detail: None,
                footer,
                editing: false,
                failed: true,
            };
        }

        let p = &state.projection;
        let b = &p.bounds;
        let status = format!(
            "File: {} | Bounds: lon {:.4} .. {:.4} | lat {:.4} .. {:.4} | Canvas: {}x{} | Polygons: {}",
            state.path.as_deref().unwrap_or_default(),
            b.lon_min,
            b.lon_max,
            b.lat_min,
            b.lat_max,
            p.width,
            p.height,
            p.polygons.len(),
        );
        Self {
            ready: true,
            title: TITLE,
            canvas,
            status,
            detail: None,
            footer,
            editing: false,
            failed: false,
        }
    }
}
