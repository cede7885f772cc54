use crate::screen::Screen;
use crate::ui;
use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use monitor_core::{dispatch, Dashboard, Message};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct App {
    pub dashboard:   Dashboard,
    pub screen:      Screen,
    pub should_quit: bool,
}

impl App {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            dashboard:   Dashboard::new(history_capacity),
            screen:      Screen::new(),
            should_quit: false,
        }
    }

    /// Draw, then wait for either a server message or a terminal event.
    pub async fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        mut messages: mpsc::Receiver<Message>,
    ) -> anyhow::Result<()> {
        let mut event_stream = crossterm::event::EventStream::new();

        loop {
            terminal.draw(|frame| ui::render(frame, &self.screen))?;

            if self.should_quit {
                return Ok(());
            }

            tokio::select! {
                msg = messages.recv() => match msg {
                    Some(msg) => self.on_message(msg),
                    None => {
                        warn!("Push listener stopped; exiting");
                        self.should_quit = true;
                    }
                },
                event = event_stream.next() => match event {
                    Some(Ok(evt)) => self.handle_event(evt),
                    Some(Err(e)) => warn!("Terminal event error: {e}"),
                    None => self.should_quit = true,
                },
            }
        }
    }

    pub fn on_message(&mut self, msg: Message) {
        debug!("Message: {}", msg.kind());
        dispatch(&mut self.dashboard, &mut self.screen, msg, &Local::now());
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // An open alert swallows every other key.
        if self.screen.current_alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.screen.dismiss_alert();
            }
            return;
        }

        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.should_quit = true;
        }
    }
}
