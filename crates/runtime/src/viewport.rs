//! Interactive viewport controller.
//!
//! The controller is a pure transition function: [`ViewportState::update`]
//! consumes the state and one [`ViewportEvent`] and returns the next state
//! plus a list of [`Effect`]s. Executing effects (reading files, projecting,
//! exiting) is left to the outer driver, which feeds each result back in as
//! exactly one [`ViewportEvent::LoadCompleted`].

use std::path::PathBuf;
use std::sync::Arc;

use formats::GeoLayer;
use layers::ProjectedGeometry;
use tracing::debug;

use crate::job::{
    Generation, GenerationCounter, LoadCompletion, LoadError, LoadRequest, ProjectRequest,
};

/// Columns reserved for borders and panels around the canvas.
pub const CHROME_COLS: usize = 8;
/// Rows reserved for title, borders, info panel and footer.
pub const CHROME_ROWS: usize = 8;
pub const MIN_CANVAS_WIDTH: usize = 20;
pub const MIN_CANVAS_HEIGHT: usize = 10;

/// Input keys, already decoded from the terminal's key events.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Esc,
    Left,
    Right,
    Up,
    Down,
    /// Empty the path buffer (Ctrl+U).
    ClearLine,
    /// Ctrl+C; quits from any mode.
    Interrupt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    Resize { width: usize, height: usize },
    Key(Key),
    LoadCompleted(LoadCompletion),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load(LoadRequest),
    Project(ProjectRequest),
    Quit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No terminal size known yet.
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerError {
    Load(LoadError),
    EmptyPath,
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::Load(e) => write!(f, "{e}"),
            ViewerError::EmptyPath => write!(f, "path must not be empty"),
        }
    }
}

impl std::error::Error for ViewerError {}

#[derive(Debug, Clone, PartialEq)]
enum InFlight {
    Load { generation: Generation, path: String },
    Project { generation: Generation },
}

impl InFlight {
    fn generation(&self) -> Generation {
        match self {
            InFlight::Load { generation, .. } | InFlight::Project { generation } => *generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub phase: Phase,
    pub path: Option<String>,
    pub edit_buffer: String,
    pub editing: bool,
    pub terminal_width: usize,
    pub terminal_height: usize,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub max_canvas_width: usize,
    pub max_canvas_height: usize,
    /// User override, kept across terminal resizes.
    pub fixed_width: Option<usize>,
    pub fixed_height: Option<usize>,
    pub layer: Option<Arc<GeoLayer>>,
    pub projection: ProjectedGeometry,
    pub last_error: Option<ViewerError>,
    pub running: bool,
    in_flight: Option<InFlight>,
    generations: GenerationCounter,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ViewportState {
    /// Without a path the controller starts in path-edit mode.
    pub fn new(path: Option<String>) -> Self {
        let path = path.filter(|p| !p.trim().is_empty());
        let editing = path.is_none();
        Self {
            phase: Phase::Uninitialized,
            path,
            edit_buffer: String::new(),
            editing,
            terminal_width: 0,
            terminal_height: 0,
            canvas_width: 0,
            canvas_height: 0,
            max_canvas_width: 0,
            max_canvas_height: 0,
            fixed_width: None,
            fixed_height: None,
            layer: None,
            projection: ProjectedGeometry::default(),
            last_error: None,
            running: true,
            in_flight: None,
            generations: GenerationCounter::new(),
        }
    }

    pub fn with_fixed_size(mut self, width: Option<usize>, height: Option<usize>) -> Self {
        self.fixed_width = width;
        self.fixed_height = height;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// True while a dispatched load or projection has not reported back.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn update(mut self, event: ViewportEvent) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match event {
            ViewportEvent::Resize { width, height } => self.on_resize(width, height, &mut effects),
            ViewportEvent::Key(key) => self.on_key(key, &mut effects),
            ViewportEvent::LoadCompleted(done) => self.on_load_completed(done, &mut effects),
        }
        (self, effects)
    }

    fn on_resize(&mut self, width: usize, height: usize, effects: &mut Vec<Effect>) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.max_canvas_width = width.saturating_sub(CHROME_COLS).max(MIN_CANVAS_WIDTH);
        self.max_canvas_height = height.saturating_sub(CHROME_ROWS).max(MIN_CANVAS_HEIGHT);

        let new_width = match self.fixed_width {
            Some(w) => w.clamp(MIN_CANVAS_WIDTH, self.max_canvas_width),
            None => self.max_canvas_width,
        };
        let new_height = match self.fixed_height {
            Some(h) => h.clamp(MIN_CANVAS_HEIGHT, self.max_canvas_height),
            None => self.max_canvas_height,
        };
        let changed = (new_width, new_height) != (self.canvas_width, self.canvas_height);
        self.canvas_width = new_width;
        self.canvas_height = new_height;
        self.phase = Phase::Ready;

        if (changed || self.projection.is_empty()) && self.path.is_some() && !self.editing {
            self.refresh(effects);
        }
    }

    fn on_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        if key == Key::Interrupt {
            self.quit(effects);
            return;
        }
        if self.editing {
            self.on_edit_key(key, effects);
            return;
        }
        match key {
            Key::Char('q') => self.quit(effects),
            Key::Char('r') => self.reload(effects),
            Key::Char('e' | '/') => self.begin_edit(),
            Key::Right | Key::Char('l') => self.nudge_canvas(1, 0, effects),
            Key::Left | Key::Char('h') => self.nudge_canvas(-1, 0, effects),
            Key::Down | Key::Char('j') => self.nudge_canvas(0, 1, effects),
            Key::Up | Key::Char('k') => self.nudge_canvas(0, -1, effects),
            _ => {}
        }
    }

    fn on_edit_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        match key {
            Key::Char(c) if !c.is_control() => self.edit_buffer.push(c),
            Key::Backspace => {
                self.edit_buffer.pop();
            }
            Key::ClearLine => self.edit_buffer.clear(),
            Key::Esc => self.cancel_edit(effects),
            Key::Enter => self.commit_edit(effects),
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        self.edit_buffer = self.path.clone().unwrap_or_default();
        self.editing = true;
    }

    fn cancel_edit(&mut self, effects: &mut Vec<Effect>) {
        // Nothing to fall back to without a path.
        if self.path.is_none() {
            return;
        }
        self.editing = false;
        if self.last_error == Some(ViewerError::EmptyPath) {
            self.last_error = None;
        }
        // Terminal resizes while editing were not acted on.
        if self.is_ready() && self.projection.size() != self.canvas_size() {
            self.refresh(effects);
        }
    }

    fn commit_edit(&mut self, effects: &mut Vec<Effect>) {
        let trimmed = self.edit_buffer.trim();
        if trimmed.is_empty() {
            self.last_error = Some(ViewerError::EmptyPath);
            return;
        }
        self.path = Some(trimmed.to_string());
        self.editing = false;
        self.layer = None;
        self.projection = ProjectedGeometry::default();
        self.last_error = None;
        if self.is_ready() {
            self.refresh(effects);
        }
    }

    fn reload(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_ready() || self.path.is_none() {
            return;
        }
        if self.full_load_in_flight() {
            debug!("reload ignored: load already in flight");
            return;
        }
        self.dispatch_load(effects);
    }

    fn nudge_canvas(&mut self, dw: isize, dh: isize, effects: &mut Vec<Effect>) {
        if !self.is_ready() || self.path.is_none() {
            return;
        }
        let width = step(self.canvas_width, dw, MIN_CANVAS_WIDTH, self.max_canvas_width);
        let height = step(self.canvas_height, dh, MIN_CANVAS_HEIGHT, self.max_canvas_height);
        if (width, height) == self.canvas_size() {
            return;
        }
        if width != self.canvas_width {
            self.fixed_width = Some(width);
        }
        if height != self.canvas_height {
            self.fixed_height = Some(height);
        }
        self.canvas_width = width;
        self.canvas_height = height;
        self.refresh(effects);
    }

    fn on_load_completed(&mut self, done: LoadCompletion, effects: &mut Vec<Effect>) {
        let current = self.in_flight.as_ref().map(InFlight::generation);
        if current != Some(done.generation) {
            debug!(generation = done.generation.0, "discarding superseded load result");
            return;
        }
        self.in_flight = None;

        match done.outcome {
            Ok(loaded) => {
                self.layer = Some(loaded.layer);
                self.projection = loaded.projection;
                self.last_error = None;
                if !self.editing && self.projection.size() != self.canvas_size() {
                    self.refresh(effects);
                }
            }
            Err(e) => {
                self.layer = None;
                self.projection = ProjectedGeometry::default();
                self.last_error = Some(ViewerError::Load(e));
            }
        }
    }

    fn quit(&mut self, effects: &mut Vec<Effect>) {
        self.running = false;
        effects.push(Effect::Quit);
    }

    /// Bring the projection in line with the current canvas size, reusing the
    /// cached layer when there is one.
    fn refresh(&mut self, effects: &mut Vec<Effect>) {
        if self.full_load_in_flight() {
            // The completion handler re-projects if the size moved meanwhile.
            return;
        }
        match self.layer.clone() {
            Some(layer) => self.dispatch_project(layer, effects),
            None => self.dispatch_load(effects),
        }
    }

    fn full_load_in_flight(&self) -> bool {
        matches!(
            (&self.in_flight, &self.path),
            (Some(InFlight::Load { path: loading, .. }), Some(path)) if loading == path
        )
    }

    fn dispatch_load(&mut self, effects: &mut Vec<Effect>) {
        let Some(path) = self.path.clone() else {
            return;
        };
        let generation = self.generations.next();
        effects.push(Effect::Load(LoadRequest {
            generation,
            path: PathBuf::from(&path),
            width: self.canvas_width,
            height: self.canvas_height,
        }));
        self.in_flight = Some(InFlight::Load { generation, path });
    }

    fn dispatch_project(&mut self, layer: Arc<GeoLayer>, effects: &mut Vec<Effect>) {
        let generation = self.generations.next();
        effects.push(Effect::Project(ProjectRequest {
            generation,
            layer,
            width: self.canvas_width,
            height: self.canvas_height,
        }));
        self.in_flight = Some(InFlight::Project { generation });
    }

    fn canvas_size(&self) -> (usize, usize) {
        (self.canvas_width, self.canvas_height)
    }
}

fn step(value: usize, delta: isize, min: usize, max: usize) -> usize {
    value.saturating_add_signed(delta).clamp(min, max.max(min))
}
