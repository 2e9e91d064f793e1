// In app/src/watch.rs

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use app_config::Settings;
use engine::{RefreshMode, Session};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::MissedTickBehavior;

use crate::report;

/// An operator command typed into `watch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Clear,
    Quit,
    Unknown(String),
}

impl Command {
    /// Blank lines are not commands.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        match line.as_str() {
            "" => None,
            "r" | "refresh" => Some(Command::Refresh),
            "c" | "clear" => Some(Command::Clear),
            "q" | "quit" => Some(Command::Quit),
            _ => Some(Command::Unknown(line)),
        }
    }
}

/// Line-oriented operator input.
///
/// Once the reader hits end of input (or fails) it is dropped and
/// `next_command` stays pending, so a detached `watch` keeps refreshing.
pub struct OperatorInput<R> {
    lines: Option<Lines<R>>,
}

impl<R: AsyncBufRead + Unpin> OperatorInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Some(reader.lines()),
        }
    }

    pub async fn next_command(&mut self) -> Command {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                return std::future::pending().await;
            };
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(command) = Command::parse(&line) {
                        return command;
                    }
                }
                Ok(None) => {
                    tracing::info!("Input closed, continuing with scheduled refreshes.");
                    self.lines = None;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read input, continuing with scheduled refreshes.");
                    self.lines = None;
                }
            }
        }
    }
}

/// Periodic refresh loop with operator commands, until `q` or `shutdown` resolves.
///
/// `shutdown` is polled across iterations, so a signal that arrives while a
/// refresh is in flight ends the loop as soon as that refresh returns.
pub async fn run_watch<R, F>(
    session: &Session,
    settings: &Settings,
    mut input: OperatorInput<R>,
    shutdown: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut ticker =
        tokio::time::interval(Duration::from_secs(settings.session.refresh_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    println!("Commands: [r]efresh, [c]lear signals, [q]uit");

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!("Interrupted, stopping.");
                break;
            }
            command = input.next_command() => match command {
                Command::Refresh => {
                    refresh_and_print(session, settings, RefreshMode::Forced).await;
                }
                Command::Clear => {
                    let dropped = session.clear_signals().await;
                    println!("Cleared {dropped} signal(s).");
                }
                Command::Quit => break,
                Command::Unknown(other) => println!("Unknown command '{other}'. Use r, c or q."),
            },
            _ = ticker.tick() => {
                refresh_and_print(session, settings, RefreshMode::Scheduled).await;
            }
        }
    }

    Ok(())
}

/// Errors are shown to the operator; the previous view stays valid.
async fn refresh_and_print(session: &Session, settings: &Settings, mode: RefreshMode) {
    match session.refresh(mode).await {
        Ok(snapshot) => {
            println!("\n{}", report::render_dashboard(&snapshot, settings.session.candle_view));
        }
        Err(e) => {
            tracing::error!(error = %e, "Refresh failed.");
            println!("\nRefresh failed: {e}. Showing previous data until the next refresh.");
        }
    }
}
