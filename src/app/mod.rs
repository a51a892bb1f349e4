//! Terminal UI shell: password prompt, profile toggle, stats pane.

mod theme;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify_rust::{Hint, Notification};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::auth::{AuthError, AuthSession, MAX_ATTEMPTS, REFRESH_INTERVAL};
use crate::cli::UserArgs;
use crate::tlp::{self, Profile};

pub use theme::{scale_for, Scale, Theme, ThemeName};

const TICK_RATE: Duration = Duration::from_millis(200);

/// Prompt for the sudo password and validate it, retrying up to
/// [`MAX_ATTEMPTS`] times. Runs on the plain terminal, before the
/// alternate screen takes over.
pub async fn authenticate() -> anyhow::Result<AuthSession> {
    for attempt in 1..=MAX_ATTEMPTS {
        let password = match prompt_password(attempt)? {
            Some(entered) if !entered.is_empty() => entered,
            _ => bail!("Cancelled."),
        };

        match AuthSession::acquire(&password).await {
            Ok(session) => return Ok(session),
            Err(err @ (AuthError::WrongPassword | AuthError::Rejected(_)))
                if attempt < MAX_ATTEMPTS =>
            {
                println!("{err}");
            }
            Err(AuthError::WrongPassword | AuthError::Rejected(_)) => break,
            Err(err) => return Err(err).context("sudo validation failed"),
        }
    }

    bail!("Authentication failed {MAX_ATTEMPTS} times.")
}

fn prompt_password(attempt: u32) -> anyhow::Result<Option<String>> {
    let mut stdout = io::stdout();

    if attempt == 1 {
        println!("Authentication required to run TLP Boost.");
    }
    print!("Enter your password ({attempt}/{MAX_ATTEMPTS}): ");
    stdout.flush()?;

    enable_raw_mode()?;
    let entered = read_masked(&mut stdout);
    disable_raw_mode()?;
    println!();

    entered
}

fn read_masked(stdout: &mut io::Stdout) -> anyhow::Result<Option<String>> {
    let mut password = String::new();

    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => return Ok(Some(password)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None)
                }
                KeyCode::Backspace => {
                    if password.pop().is_some() {
                        print!("\u{8} \u{8}");
                        stdout.flush()?;
                    }
                }
                KeyCode::Char(entered) => {
                    password.push(entered);
                    print!("*");
                    stdout.flush()?;
                }
                _ => {}
            }
        }
    }
}

/// Desktop notification for fatal errors; the terminal is usually still
/// in the alternate screen when these happen.
pub fn notify_fatal(message: &str) {
    if let Err(e) = Notification::new()
        .summary("TLP Boost")
        .body(message)
        .hint(Hint::Transient(true))
        .urgency(notify_rust::Urgency::Critical)
        .show()
    {
        log::error!("error notification failed: {:?}", e);
    }
}

struct App {
    profile: Profile,
    stats: String,
    theme: Theme,
    scale: Scale,
    session: AuthSession,
    last_refresh: Instant,
    toggling: bool,
}

/// Bring up the alternate screen and run the event loop until the user
/// quits or a fatal error surfaces. The terminal is restored on every
/// path out; the session is dropped (and sudo revoked) by the caller.
pub async fn run(args: UserArgs, session: AuthSession) -> anyhow::Result<()> {
    let mut app = App {
        profile: Profile::Default,
        stats: String::new(),
        theme: Theme::from_name(args.theme),
        scale: scale_for(args.font_size),
        session,
        last_refresh: Instant::now(),
        toggling: false,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.event_loop(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

impl App {
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        self.stats = format!("{}{}", action_text(self.profile), current_stats().await);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Char('c')
                                if key.modifiers.contains(KeyModifiers::CONTROL) =>
                            {
                                return Ok(())
                            }
                            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('t') => {
                                self.toggle().await?
                            }
                            KeyCode::Char('r') => self.stats = current_stats().await,
                            _ => {}
                        }
                    }
                }
            }

            // Sequential awaits keep at most one refresh in flight; the
            // interval restarts only after the current one completed.
            if self.last_refresh.elapsed() >= REFRESH_INTERVAL {
                self.session
                    .refresh()
                    .await
                    .context("Authentication failure")?;
                self.stats = current_stats().await;
                self.last_refresh = Instant::now();
            }
        }
    }

    async fn toggle(&mut self) -> anyhow::Result<()> {
        if self.toggling {
            return Ok(());
        }
        self.toggling = true;
        let result = tlp::toggle(self.profile).await;
        self.toggling = false;

        // The profile only moves on success; a failed command left the
        // device in its previous state.
        let next = result.context("TLP command failed")?;
        self.profile = next;
        self.stats = format!("{}{}", action_text(next), current_stats().await);
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        let base = Style::default()
            .bg(self.theme.background)
            .fg(self.theme.text);
        frame.render_widget(Block::default().style(base), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(self.scale.vertical + 1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(4),
            ])
            .split(area);

        let accent = self.theme.accent(self.profile);

        let banner = Paragraph::new(banner_text(self.profile))
            .alignment(Alignment::Center)
            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent)),
            );
        frame.render_widget(banner, chunks[0]);

        let hint = if self.toggling {
            "Working..."
        } else {
            button_text(self.profile)
        };
        let instructions = Paragraph::new(vec![
            Line::from(hint),
            Line::from("You can close this app after selecting the required profile."),
            Line::from("r: refresh stats   q: quit"),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(instructions, chunks[1]);

        let stats = Paragraph::new(self.stats.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Battery stats")
                    .padding(Padding::new(
                        self.scale.horizontal,
                        self.scale.horizontal,
                        self.scale.vertical,
                        0,
                    )),
            );
        frame.render_widget(stats, chunks[2]);
    }
}

async fn current_stats() -> String {
    match tlp::query_stats().await {
        Ok(raw) => tlp::summarize(&raw),
        Err(e) => {
            log::error!("stats query failed: {}", e);
            format!("Error: {e}")
        }
    }
}

fn action_text(profile: Profile) -> &'static str {
    match profile {
        Profile::Default => "TLP reset to current defaults.\n\n",
        Profile::Recharge => "Charging to full capacity.\n\n",
    }
}

fn banner_text(profile: Profile) -> &'static str {
    match profile {
        Profile::Default => "Default TLP profile",
        Profile::Recharge => "Full Recharge Enabled",
    }
}

fn button_text(profile: Profile) -> &'static str {
    match profile {
        Profile::Default => "Press Enter to Recharge",
        Profile::Recharge => "Press Enter to switch to Default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_and_button_follow_profile() {
        assert_eq!(banner_text(Profile::Default), "Default TLP profile");
        assert_eq!(banner_text(Profile::Recharge), "Full Recharge Enabled");
        assert!(button_text(Profile::Default).contains("Recharge"));
        assert!(button_text(Profile::Recharge).contains("Default"));
    }

    #[test]
    fn action_text_describes_the_new_profile() {
        assert!(action_text(Profile::Default).starts_with("TLP reset"));
        assert!(action_text(Profile::Recharge).starts_with("Charging to full"));
    }
}
