//! Interactive event loop.
//!
//! Reads one action identifier per line and dispatches it to the widget.
//! Every add starts a revert timer carrying its acknowledgment token; between
//! lines the loop sleeps until the earliest timer so "Added ✓" reverts on
//! time even while the shopper is idle. Everything runs on the current
//! thread.

use std::time::Instant;

use storecart_core::ProductId;
use storecart_storefront::feedback::AckToken;
use storecart_storefront::{Action, CLEAR_CART_PROMPT, Effect, FileStore, Storefront};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

use super::cart::is_yes;
use super::print_effects;

/// What the loop should do with one input line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Dispatch(Action),
    Help,
    Quit,
    Empty,
}

/// Pending acknowledgment reverts, one per add.
#[derive(Debug, Default)]
struct AckTimers {
    pending: Vec<(Instant, ProductId, AckToken)>,
}

impl AckTimers {
    /// Start a timer for every acknowledgment in `effects`.
    fn schedule(&mut self, effects: &[Effect]) {
        for effect in effects {
            if let Effect::Acknowledged { id, token, until } = effect {
                self.pending.push((*until, id.clone(), *token));
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, ..)| *at).min()
    }

    /// Remove and return the timers due at `now`.
    fn take_due(&mut self, now: Instant) -> Vec<(ProductId, AckToken)> {
        let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, ..)| *at <= now);
        self.pending = rest;
        due.into_iter().map(|(_, id, token)| (id, token)).collect()
    }
}

fn parse_line(line: &str) -> Result<Command, String> {
    match line.trim() {
        "" => Ok(Command::Empty),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => other
            .parse::<Action>()
            .map(Command::Dispatch)
            .map_err(|e| e.to_string()),
    }
}

/// Run the interactive loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or output fails to render.
#[allow(clippy::print_stdout)]
pub async fn run(storefront: &mut Storefront<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut timers = AckTimers::default();

    print_help();
    if let Some(count) = storefront.count_badge() {
        println!("cart count: {count}");
    }

    loop {
        prompt("> ").await;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };

                match parse_line(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => print_help(),
                    Ok(Command::Empty) => {}
                    Ok(Command::Dispatch(action)) => {
                        let answer = if action == Action::ClearCart && storefront.layout().clear_button {
                            ask(&mut lines).await?
                        } else {
                            false
                        };
                        let effects =
                            storefront.dispatch(action, &mut |_: &str| answer, Instant::now());
                        timers.schedule(&effects);
                        print_effects(&effects)?;
                    }
                    Err(e) => {
                        warn!(input = %line.trim(), "Unrecognized action");
                        println!("{e} (type 'help' for actions)");
                    }
                }
            }
            () = sleep_until(timers.next_deadline()) => {
                let reverted: Vec<Effect> = timers
                    .take_due(Instant::now())
                    .into_iter()
                    .filter_map(|(id, token)| storefront.revert_ack(&id, token))
                    .collect();
                if !reverted.is_empty() {
                    println!();
                    print_effects(&reverted)?;
                }
            }
        }
    }

    Ok(())
}

/// Ask the clear-cart question on the shared line reader.
async fn ask(lines: &mut Lines<BufReader<Stdin>>) -> std::io::Result<bool> {
    prompt(&format!("{CLEAR_CART_PROMPT} [y/N] ")).await;
    Ok(lines.next_line().await?.is_some_and(|answer| is_yes(&answer)))
}

async fn prompt(text: &str) {
    let mut stdout = tokio::io::stdout();
    let _ = stdout.write_all(text.as_bytes()).await;
    let _ = stdout.flush().await;
}

/// Sleep until `deadline`, or forever without one.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

#[allow(clippy::print_stdout)]
fn print_help() {
    println!("Actions:");
    for identifier in Action::IDENTIFIERS {
        println!("  {identifier}");
    }
    println!("  help | quit");
}
