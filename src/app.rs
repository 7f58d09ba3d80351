use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use ratatui::layout::{Position, Rect};

use crate::config::Config;
use crate::session::controller::{GameSession, SessionEffect};
use crate::session::input::InputEvent;
use crate::session::result::SessionSummary;
use crate::sink::{self, NullSink, ResultSink};
use crate::sink::local::LocalResultSink;
use crate::source::dictionary::{self, Library};
use crate::source::local::LocalWordSource;
use crate::source::{WordSource, fetch_session};
use crate::speech::{self, SilentSpeaker, Speaker};
use crate::store::ProgressBook;
use crate::store::json_store::JsonStore;
use crate::ui::components::keyboard::{self, KeyTarget};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::layout::SessionLayout;
use crate::ui::theme::Theme;

const KEY_FLASH: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Session,
    Summary,
    Notice,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub library: Library,
    pub dictionary_id: Option<u64>,
    pub menu_selected: usize,
    pub session: Option<GameSession<SmallRng>>,
    pub last_summary: Option<SessionSummary>,
    pub notice: Option<String>,
    pub pressed: Option<(KeyTarget, Instant)>,
    /// Terminal area of the last draw, for mouse hit-testing.
    pub viewport: Rect,
    /// Where dictionary choices are remembered. `None` keeps them in memory.
    pub config_path: Option<PathBuf>,
    pub should_quit: bool,
    source: Box<dyn WordSource>,
    sink: Arc<dyn ResultSink>,
    speaker: Box<dyn Speaker>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = Theme::load_or_default(&config.theme);
        let library = Library::load_with_user_dir(dictionary::user_dictionary_dir().as_deref());

        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(%err, "progress store unavailable, keeping progress in memory");
                None
            }
        };
        let progress = ProgressBook::open(store).shared();

        let mut rng = SmallRng::from_entropy();
        let local_source = LocalWordSource::new(
            library.clone(),
            progress.clone(),
            config.session_size,
            SmallRng::seed_from_u64(rng.next_u64()),
        );
        let (source, sink): (Box<dyn WordSource>, Arc<dyn ResultSink>) =
            match remote_backends(&config) {
                Some(remote) => remote,
                None => (
                    Box::new(local_source),
                    Arc::new(LocalResultSink::new(progress)),
                ),
            };
        let speaker = speech::from_settings(config.speech_enabled, &config.speech_command);
        tracing::info!(source = %source.describe(), sink = sink.name(), "backends ready");

        let mut app = Self::with_parts(config, library, source, sink, speaker, rng);
        app.theme = theme;
        app.config_path = Some(Config::default_path());
        app
    }

    pub fn with_parts(
        config: Config,
        library: Library,
        source: Box<dyn WordSource>,
        sink: Arc<dyn ResultSink>,
        speaker: Box<dyn Speaker>,
        rng: SmallRng,
    ) -> Self {
        let dictionary_id = config
            .dictionary_id
            .filter(|id| library.get(*id).is_some_and(|d| d.is_active));
        Self {
            screen: AppScreen::Menu,
            dictionary_id,
            theme: Theme::default(),
            library,
            config,
            menu_selected: 0,
            session: None,
            last_summary: None,
            notice: None,
            pressed: None,
            viewport: Rect::default(),
            config_path: None,
            should_quit: false,
            source,
            sink,
            speaker,
            rng,
        }
    }

    /// A headless app for tests: no store, no speech, log-only sink.
    pub fn offline(library: Library, seed: u64) -> Self {
        let progress = ProgressBook::in_memory(Default::default()).shared();
        let config = Config::default();
        let source = LocalWordSource::new(
            library.clone(),
            progress,
            config.session_size,
            SmallRng::seed_from_u64(seed),
        );
        Self::with_parts(
            config,
            library,
            Box::new(source),
            Arc::new(NullSink),
            Box::new(SilentSpeaker),
            SmallRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn dictionary_label(&self) -> String {
        match self.dictionary_id.and_then(|id| self.library.get(id)) {
            Some(dictionary) => dictionary.name.clone(),
            None => "All dictionaries".to_string(),
        }
    }

    /// Steps through "all", then each active dictionary, then back to "all".
    pub fn next_dictionary_id(&self) -> Option<u64> {
        let mut ids = self
            .library
            .dictionaries()
            .iter()
            .filter(|d| d.is_active)
            .map(|d| d.id);
        match self.dictionary_id {
            None => ids.next(),
            Some(current) => ids.skip_while(|&id| id != current).nth(1),
        }
    }

    pub fn cycle_dictionary(&mut self) {
        self.dictionary_id = self.next_dictionary_id();
        self.config.dictionary_id = self.dictionary_id;
        if let Err(err) = self.remember_dictionary() {
            tracing::warn!(%err, "could not save config");
        }
    }

    /// Persist only the dictionary choice. The in-memory config also carries
    /// command-line overrides, which apply to this run alone.
    fn remember_dictionary(&self) -> anyhow::Result<()> {
        let Some(path) = self.config_path.as_deref() else {
            return Ok(());
        };
        let mut stored = Config::load_from(path)?;
        stored.dictionary_id = self.dictionary_id;
        stored.save_to(path)
    }

    pub fn menu(&self) -> Menu<'_> {
        Menu::new(
            &self.theme,
            &self.dictionary_label(),
            &self.source_description(),
            self.menu_selected,
        )
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = (self.menu_selected + 1) % Menu::LEN;
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = (self.menu_selected + Menu::LEN - 1) % Menu::LEN;
    }

    pub fn activate_menu(&mut self) {
        match self.menu().action() {
            MenuAction::Start => self.start_session(),
            MenuAction::Dictionary => self.cycle_dictionary(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn start_session(&mut self) {
        self.start_session_at(Instant::now());
    }

    pub fn start_session_at(&mut self, now: Instant) {
        self.leave_session();

        let words = match fetch_session(self.source.as_mut(), self.dictionary_id) {
            Ok(words) => words,
            Err(err) => {
                tracing::warn!(%err, "could not load session words");
                self.show_notice(format!("Could not start a mission: {err}"));
                return;
            }
        };
        let rng = SmallRng::seed_from_u64(self.rng.next_u64());
        match GameSession::new(words, self.config.session_settings(), rng, now) {
            Ok(session) => {
                self.session = Some(session);
                self.last_summary = None;
                self.screen = AppScreen::Session;
                self.apply_effects();
            }
            Err(err) => {
                tracing::warn!(%err, "session refused to start");
                self.show_notice(format!("Could not start a mission: {err}"));
            }
        }
    }

    pub fn show_notice(&mut self, message: String) {
        self.notice = Some(message);
        self.screen = AppScreen::Notice;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.screen = AppScreen::Menu;
    }

    /// Dispose the running session, if any, and return to the menu.
    pub fn leave_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose();
        }
        self.pressed = None;
        self.screen = AppScreen::Menu;
    }

    fn apply_effects(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for effect in session.drain_effects() {
            match effect {
                SessionEffect::Speak(text) => self.speaker.speak(&text),
                SessionEffect::Report(report) => {
                    sink::dispatch(&self.sink, report);
                }
                SessionEffect::Completed(summary) => {
                    tracing::info!(
                        score = summary.score,
                        accuracy = summary.accuracy(),
                        "mission complete"
                    );
                    self.last_summary = Some(summary);
                    self.screen = AppScreen::Summary;
                }
            }
        }
    }

    /// Timers are caught up first, so input arriving past a deadline lands
    /// in the round that deadline would have started.
    pub fn input_at(&mut self, event: InputEvent, now: Instant) {
        self.tick_at(now);
        if let Some(session) = self.session.as_mut() {
            session.handle_input(event, now);
            self.apply_effects();
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if let Some(event) = InputEvent::from_char(ch) {
            self.pressed = Some((KeyTarget::Letter(ch.to_ascii_lowercase()), Instant::now()));
            self.input_at(event, Instant::now());
        }
    }

    pub fn backspace(&mut self) {
        self.pressed = Some((KeyTarget::Backspace, Instant::now()));
        self.input_at(InputEvent::Backspace, Instant::now());
    }

    pub fn retry_visible(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.round())
            .is_some_and(|r| r.retry_offered)
    }

    pub fn retry_at(&mut self, now: Instant) {
        self.tick_at(now);
        if let Some(session) = self.session.as_mut()
            && session.acknowledge_retry(now)
        {
            self.apply_effects();
        }
    }

    pub fn retry(&mut self) {
        self.retry_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self
            .pressed
            .is_some_and(|(_, at)| now.saturating_duration_since(at) > KEY_FLASH)
        {
            self.pressed = None;
        }
        if let Some(session) = self.session.as_mut() {
            session.tick(now);
            self.apply_effects();
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Left click on the session screen: the retry button when shown,
    /// otherwise the on-screen keyboard.
    pub fn click_at(&mut self, column: u16, row: u16, now: Instant) {
        if self.screen != AppScreen::Session {
            return;
        }
        self.tick_at(now);
        let layout = SessionLayout::new(self.viewport);
        if self.retry_visible() && layout.retry.contains(Position::new(column, row)) {
            self.retry_at(now);
            return;
        }
        if let Some(area) = layout.keyboard
            && let Some(target) = keyboard::key_at(area, column, row)
        {
            self.pressed = Some((target, now));
            self.input_at(target.to_input(), now);
        }
    }

    pub fn pressed_key(&self) -> Option<KeyTarget> {
        self.pressed.map(|(target, _)| target)
    }
}

#[cfg(feature = "network")]
fn remote_backends(config: &Config) -> Option<(Box<dyn WordSource>, Arc<dyn ResultSink>)> {
    use crate::server::ServerClient;
    use crate::sink::http::HttpResultSink;
    use crate::source::http::HttpWordSource;

    let url = config.server_url.as_deref()?;
    let credentials = config.credentials();
    if credentials.is_none() {
        tracing::warn!("no username configured, the server may refuse session requests");
    }
    match ServerClient::new(url, credentials) {
        Ok(server) => {
            let server = Arc::new(server);
            Some((
                Box::new(HttpWordSource::new(Arc::clone(&server), config.user_id)),
                Arc::new(HttpResultSink::new(server)),
            ))
        }
        Err(err) => {
            tracing::warn!(%err, "server client unavailable, playing offline");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn remote_backends(config: &Config) -> Option<(Box<dyn WordSource>, Arc<dyn ResultSink>)> {
    if config.server_url.is_some() {
        tracing::warn!("built without network support, ignoring server_url");
    }
    None
}
