mod input;
mod logging;
mod render;

use std::{cell::RefCell, io, rc::Rc};

use idle_sourdough::economy::snapshot::Snapshot;
use idle_sourdough::{Engine, EngineConfig};
use input::{command_for, Command, View};
use ratatui::Terminal;
use ratzilla::event::KeyCode;
use ratzilla::{DomBackend, WebRenderer};
use render::Screen;
use tracing::warn;

#[cfg(target_arch = "wasm32")]
use idle_sourdough::persistence::{LocalStorageIdentity as Ids, LocalStorageStore as Store};
#[cfg(not(target_arch = "wasm32"))]
use idle_sourdough::persistence::{MemoryIdentity as Ids, MemoryStore as Store};

/// Players shown on the leaderboard.
const LEADERBOARD_SIZE: usize = 10;

#[cfg(target_arch = "wasm32")]
fn open_store() -> Store {
    Store::open()
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store() -> Store {
    Store::new()
}

/// Everything the shell owns: the engine plus its collaborators.
struct App {
    engine: Engine,
    store: Store,
    ids: Ids,
    view: View,
    leaderboard: Vec<Snapshot>,
    status: Option<String>,
}

impl App {
    fn new(config: EngineConfig, store: Store, ids: Ids) -> Self {
        let mut app = Self {
            engine: Engine::new(config),
            store,
            ids,
            view: View::default(),
            leaderboard: Vec::new(),
            status: None,
        };
        match app.engine.resume(&app.store, &app.ids) {
            Ok(true) => app.status = Some("Welcome back".into()),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "resume_failed");
                app.status = Some("Saved game unavailable, starting fresh".into());
            }
        }
        app
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Feed => {
                self.engine.feed();
            }
            Command::Buy(kind) => {
                self.engine.purchase(kind);
            }
            Command::Save => self.save(),
            Command::ToggleLeaderboard => {
                self.view = self.view.toggled();
                if self.view == View::Leaderboard {
                    self.refresh_leaderboard();
                }
            }
        }
    }

    fn save(&mut self) {
        self.status = match self.engine.save_to(&mut self.store, &mut self.ids) {
            Ok(id) => Some(format!("Saved (#{id})")),
            Err(_) => Some("Save failed".into()),
        };
        if self.view == View::Leaderboard {
            self.refresh_leaderboard();
        }
    }

    fn refresh_leaderboard(&mut self) {
        match self.engine.leaderboard(&self.store, LEADERBOARD_SIZE) {
            Ok(board) => self.leaderboard = board,
            Err(e) => {
                warn!(error = %e, "leaderboard_unavailable");
                self.status = Some("Leaderboard unavailable".into());
            }
        }
    }

    /// Per-frame work: replay elapsed time, then autosave when due.
    fn frame(&mut self, now_ms: f64) {
        self.engine.advance_to(now_ms);
        if self.engine.autosave_due() {
            self.save();
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init_tracing();

    let app = Rc::new(RefCell::new(App::new(
        EngineConfig::default(),
        open_store(),
        Ids::default(),
    )));
    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                if let Some(command) = command_for(c) {
                    app.borrow_mut().handle(command);
                }
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut app = app.borrow_mut();
        app.frame(js_sys::Date::now());
        let app = &*app;
        let screen = Screen {
            view: app.view,
            leaderboard: &app.leaderboard,
            status: app.status.as_deref(),
        };
        render::render(f, &app.engine, &screen);
    });

    Ok(())
}
