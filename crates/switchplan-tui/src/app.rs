//! Application loop: owns the screens, routes events to actions, and
//! actions to state changes. Screens never touch the terminal directly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const TICK_RATE: Duration = Duration::from_millis(250);
const RENDER_RATE: Duration = Duration::from_millis(33);
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub struct App {
    running: bool,
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    help_visible: bool,
    confirm: Option<String>,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(settings_path: Option<PathBuf>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
        for (id, mut screen) in create_screens(settings_path) {
            // init cannot fail for any current screen
            let _ = screen.init(action_tx.clone());
            screens.insert(id, screen);
        }
        let mut app = Self {
            running: true,
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            help_visible: false,
            confirm: None,
            notification: None,
            action_tx,
            action_rx,
        };
        app.set_screen_focus(app.active_screen, true);
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        info!("entering main loop");

        while self.running {
            if let Some(event) = events.next().await {
                match event {
                    Event::Key(key) => self.handle_key_event(key)?,
                    Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                    Event::Tick => self.action_tx.send(Action::Tick)?,
                    Event::Render => self.action_tx.send(Action::Render)?,
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                } else {
                    self.process_action(&action)?;
                }
            }
        }

        events.stop();
        tui.exit()?;
        info!("exited cleanly");
        Ok(())
    }

    fn set_screen_focus(&mut self, id: ScreenId, focused: bool) {
        if let Some(screen) = self.screens.get_mut(&id) {
            screen.set_focused(focused);
        }
    }

    fn active_overlay_open(&self) -> bool {
        self.screens
            .get(&self.active_screen)
            .is_some_and(|screen| screen.overlay_open())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Modal layers take priority: confirm dialog, then the help
        // overlay, then any screen-local form or prompt.
        if self.confirm.is_some() {
            match key.code {
                KeyCode::Char('y' | 'Y') => self.action_tx.send(Action::ConfirmYes)?,
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.action_tx.send(Action::ConfirmNo)?,
                _ => {}
            }
            return Ok(());
        }

        if self.help_visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.help_visible = false;
            }
            return Ok(());
        }

        if !self.active_overlay_open() {
            // Global bindings only apply while no form is capturing text.
            let global = match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::Quit)
                }
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char(',') => Some(Action::SwitchScreen(ScreenId::Settings)),
                KeyCode::Char(ch @ '1'..='9') => {
                    let n = ch.to_digit(10).and_then(|d| u8::try_from(d).ok());
                    n.and_then(ScreenId::from_number).map(Action::SwitchScreen)
                }
                KeyCode::Tab => Some(Action::SwitchScreen(self.active_screen.next())),
                KeyCode::BackTab => Some(Action::SwitchScreen(self.active_screen.prev())),
                KeyCode::Esc => Some(Action::GoBack),
                _ => None,
            };
            if let Some(action) = global {
                self.action_tx.send(action)?;
                return Ok(());
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(action) = screen.handle_key_event(key)? {
                self.action_tx.send(action)?;
            }
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }
            Action::Tick => {
                if let Some((_, shown_at)) = self.notification.as_ref() {
                    if shown_at.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
            }
            Action::Render | Action::Resize(..) => {}
            Action::SwitchScreen(id) => {
                if *id != self.active_screen {
                    debug!(from = %self.active_screen, to = %id, "switching screen");
                    self.set_screen_focus(self.active_screen, false);
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *id;
                    self.set_screen_focus(self.active_screen, true);
                }
            }
            Action::GoBack => {
                if let Some(previous) = self.previous_screen.take() {
                    self.set_screen_focus(self.active_screen, false);
                    self.active_screen = previous;
                    self.set_screen_focus(self.active_screen, true);
                }
            }
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }
            Action::ShowConfirm(message) => {
                self.confirm = Some(message.clone());
            }
            Action::ConfirmYes => {
                self.confirm = None;
                self.action_tx.send(Action::DeleteConfirmed)?;
            }
            Action::ConfirmNo => {
                self.confirm = None;
            }
            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::DismissNotification => {
                self.notification = None;
            }
            other => {
                // Everything else belongs to the active screen.
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_tab_bar(frame, layout[0]);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_status_bar(frame, layout[2]);

        if let Some(message) = self.confirm.as_deref() {
            render_confirm(frame, frame.area(), message);
        }
        if self.help_visible {
            render_help(frame, frame.area());
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(ScreenId::ALL.len() * 2 + 2);
        spans.push(Span::styled(" ", theme::tab_inactive()));
        for (i, id) in ScreenId::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", theme::tab_inactive()));
            }
            let text = match id.number() {
                Some(n) => format!("{n}:{}", id.label()),
                None => id.label().to_string(),
            };
            if id == self.active_screen {
                spans.push(Span::styled(
                    text,
                    theme::tab_active().add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(text, theme::tab_inactive()));
            }
        }
        if self.active_screen == ScreenId::Settings {
            spans.push(Span::styled(" ", theme::tab_inactive()));
            spans.push(Span::styled(
                ScreenId::Settings.label(),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = match self.notification.as_ref() {
            Some((notification, _)) => {
                let color = match notification.level {
                    NotificationLevel::Info => theme::TEAL,
                    NotificationLevel::Success => theme::SUCCESS_GREEN,
                    NotificationLevel::Error => theme::ERROR_RED,
                };
                Line::from(Span::styled(
                    format!(" {}", notification.message),
                    Style::default().fg(color),
                ))
            }
            None => Line::from(vec![
                Span::styled(" ?", theme::key_hint_key()),
                Span::styled(" help  ", theme::key_hint()),
                Span::styled(",", theme::key_hint_key()),
                Span::styled(" settings  ", theme::key_hint()),
                Span::styled("q", theme::key_hint_key()),
                Span::styled(" quit", theme::key_hint()),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[allow(clippy::cast_possible_truncation)]
fn render_confirm(frame: &mut Frame, area: Rect, message: &str) {
    let width = (message.chars().count() as u16 + 6).max(30);
    let overlay = centered(area, width, 5);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Confirm ")
        .title_style(Style::default().fg(theme::ERROR_RED).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme::ERROR_RED));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let lines = vec![
        Line::from(Span::styled(message.to_string(), theme::table_row())).centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme::key_hint_key()),
            Span::styled(" confirm   ", theme::key_hint()),
            Span::styled("n", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ])
        .centered(),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let overlay = centered(area, 46, 16);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Keys ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!(" {keys:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let lines = vec![
        entry("1-9", "jump to screen"),
        entry("Tab/S-Tab", "next / previous screen"),
        entry("j/k", "move selection"),
        entry("a", "add a record"),
        entry("e/Enter", "edit the selected record"),
        entry("d", "delete (asks for confirmation)"),
        entry("p", "toggle the script preview"),
        entry("h/l", "switch pane or sub-tab"),
        entry(",", "open settings"),
        entry("Esc", "back to the previous screen"),
        entry("?", "toggle this help"),
        entry("q", "quit"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
