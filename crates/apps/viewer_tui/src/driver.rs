//! Interactive loop: terminal input and job completions feed the viewport
//! state machine, whose effects run on the blocking pool.

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use runtime::{Effect, FrameView, LoadCompletion, ViewportEvent, ViewportState};
use streaming::{ByteSource, FileSource, Pipeline};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::error::CliError;
use crate::keys::translate_event;
use crate::ui;

/// Runs effects off the UI task and posts each completion back.
pub struct Dispatcher<S> {
    pipeline: Arc<Pipeline<S>>,
    completions: mpsc::UnboundedSender<LoadCompletion>,
}

impl<S: ByteSource + 'static> Dispatcher<S> {
    pub fn new(pipeline: Pipeline<S>, completions: mpsc::UnboundedSender<LoadCompletion>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            completions,
        }
    }

    pub fn dispatch(&self, effect: Effect) {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.completions.clone();
        match effect {
            Effect::Load(req) => {
                info!(generation = req.generation.0, path = %req.path.display(), "load");
                tokio::task::spawn_blocking(move || post(&tx, pipeline.load(&req)));
            }
            Effect::Project(req) => {
                debug!(generation = req.generation.0, "project");
                tokio::task::spawn_blocking(move || post(&tx, pipeline.project(&req)));
            }
            Effect::Quit => {}
        }
    }
}

fn post(tx: &mpsc::UnboundedSender<LoadCompletion>, done: LoadCompletion) {
    if tx.send(done).is_err() {
        debug!("viewer closed before completion arrived");
    }
}

/// Apply one event and hand the resulting effects to `dispatcher`.
pub fn step<S: ByteSource + 'static>(
    state: ViewportState,
    event: ViewportEvent,
    dispatcher: &Dispatcher<S>,
) -> ViewportState {
    let (state, effects) = state.update(event);
    for effect in effects {
        dispatcher.dispatch(effect);
    }
    state
}

/// Raw mode plus alternate screen, undone on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Drive `future` on a fresh multi-thread runtime, then drop the runtime
/// without joining blocking tasks; a slow read must not hold up exit.
pub fn run_detached<F: Future>(future: F) -> io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

enum Input {
    Terminal(Option<io::Result<Event>>),
    Completion(LoadCompletion),
}

pub async fn run(config: &ViewerConfig) -> Result<(), CliError> {
    let mut session = TerminalSession::enter()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(Pipeline::new(FileSource), tx);
    let mut events = EventStream::new();

    let mut state = ViewportState::new(config.path.clone())
        .with_fixed_size(config.fixed_width, config.fixed_height);
    let (width, height) = crossterm::terminal::size()?;
    state = step(
        state,
        ViewportEvent::Resize {
            width: usize::from(width),
            height: usize::from(height),
        },
        &dispatcher,
    );

    while state.running {
        let view = FrameView::from_state(&state);
        session.terminal.draw(|f| ui::draw(f, &view))?;

        let input = tokio::select! {
            event = events.next() => Input::Terminal(event),
            Some(done) = rx.recv() => Input::Completion(done),
        };
        let event = match input {
            Input::Terminal(Some(Ok(event))) => match translate_event(event) {
                Some(event) => event,
                None => continue,
            },
            Input::Terminal(Some(Err(e))) => return Err(e.into()),
            Input::Terminal(None) => break,
            Input::Completion(done) => ViewportEvent::LoadCompleted(done),
        };
        state = step(state, event, &dispatcher);
    }

    info!("viewer closed");
    Ok(())
}
