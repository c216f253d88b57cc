/// Main TUI application

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::core::{spawn_poller, ChannelAlertSink, PollerHandle, StatusApi, StatusClient};
use crate::screens::StatusScreen;

pub struct App {
    screen: StatusScreen,
    poller: PollerHandle,
    updates_rx: UnboundedReceiver<crate::core::StatusUpdate>,
    alerts_rx: UnboundedReceiver<String>,
    should_quit: bool,
}

impl App {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = StatusClient::new(api_url)?;
        Ok(Self::with_api(Arc::new(client)))
    }

    pub fn with_api(api: Arc<dyn StatusApi>) -> Self {
        let (alert_tx, alerts_rx) = mpsc::unbounded_channel();
        let alerts = Arc::new(ChannelAlertSink::new(alert_tx));
        let (poller, updates_rx) = spawn_poller(api, alerts);

        Self {
            screen: StatusScreen::new(),
            poller,
            updates_rx,
            alerts_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        loop {
            // Drain poller updates (non-blocking)
            while let Ok(update) = self.updates_rx.try_recv() {
                self.screen.apply(update);
            }

            // Drain fetch errors into the footer status line
            while let Ok(message) = self.alerts_rx.try_recv() {
                self.screen.status_message = Some(message);
            }

            terminal.draw(|f| self.screen.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key_event) = event::read()? {
                    self.handle_key(key_event.code);
                }
            }

            if self.should_quit {
                // Stop refreshing before the terminal is torn down
                self.poller.stop();
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        // Any key clears a stale error message
        self.screen.status_message = None;

        if self.screen.show_help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.screen.show_help = false;
            }
            return;
        }

        if self.screen.modal.open {
            if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m')) {
                self.screen.modal.close();
            }
            return;
        }

        if self.screen.logs_view.is_some() {
            if matches!(key, KeyCode::Esc | KeyCode::Char('q')) {
                self.screen.logs_view = None;
            }
            return;
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.screen.show_help = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.screen.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.screen.select_next();
            }
            KeyCode::Char('m') | KeyCode::Enter => {
                self.screen.open_mounts_modal();
            }
            KeyCode::Char('l') => {
                self.screen.open_logs_view();
            }
            _ => {}
        }
    }
}
