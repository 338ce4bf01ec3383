//! Interactive REPL for poking at the sticks without a touchscreen

use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Duration;

use crate::host::{HostHandle, PointerEvent, Side};

const PROMPT: &str = "sticks> ";

/// One parsed REPL line
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Pointer(PointerEvent),
    Wait(Duration),
    Invert { side: Side, invert: bool },
    Status,
    Help,
    Quit,
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = words.split_first() else {
            return Ok(Self::Empty);
        };

        match cmd {
            "down" | "d" => {
                let (id, x, y) = pointer_at(args)?;
                Ok(Self::Pointer(PointerEvent::down(id, x, y)))
            }
            "move" | "m" => {
                let (id, x, y) = pointer_at(args)?;
                Ok(Self::Pointer(PointerEvent::moved(id, x, y)))
            }
            "up" | "u" => {
                // Position is optional on release
                let id = number::<u64>(args.first(), "pointer id")?;
                Ok(Self::Pointer(PointerEvent::up(id, 0.0, 0.0)))
            }
            "cancel" | "c" => {
                let id = number::<u64>(args.first(), "pointer id")?;
                Ok(Self::Pointer(PointerEvent::cancel(id)))
            }
            "wait" | "w" => {
                let ms = number::<u64>(args.first(), "milliseconds")?;
                Ok(Self::Wait(Duration::from_millis(ms)))
            }
            "invert" => {
                let side: Side = args.first().ok_or("usage: invert <left|right> <on|off>")?.parse()?;
                let invert = match args.get(1).copied() {
                    Some("on") | Some("true") | Some("1") => true,
                    Some("off") | Some("false") | Some("0") => false,
                    _ => return Err("usage: invert <left|right> <on|off>".into()),
                };
                Ok(Self::Invert { side, invert })
            }
            "status" | "s" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command '{}' (try 'help')", other)),
        }
    }
}

fn number<T: std::str::FromStr>(word: Option<&&str>, what: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("missing {}", what))?;
    word.parse().map_err(|_| format!("invalid {} '{}'", what, word))
}

fn coordinate(word: Option<&&str>, what: &str) -> Result<f32, String> {
    let value: f32 = number(word, what)?;
    if !value.is_finite() {
        return Err(format!("invalid {} '{}'", what, word.copied().unwrap_or_default()));
    }
    Ok(value)
}

fn pointer_at(args: &[&str]) -> Result<(u64, f32, f32), String> {
    Ok((
        number(args.first(), "pointer id")?,
        coordinate(args.get(1), "x")?,
        coordinate(args.get(2), "y")?,
    ))
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  down <id> <x> <y>     touch down at screen position");
    println!("  move <id> <x> <y>     drag a pointer");
    println!("  up <id>               lift a pointer");
    println!("  cancel <id>           cancel a pointer");
    println!("  wait <ms>             let time pass");
    println!("  invert <side> <on|off>");
    println!("  status                show both sticks");
    println!("  quit");
}

async fn print_status(host: &HostHandle) -> Result<()> {
    let snap = host.snapshot().await?;
    for side in Side::BOTH {
        let s = snap.side(side);
        let gate = if s.gate_open {
            format!("gate open {} ms", s.gate_remaining_ms).yellow()
        } else {
            "gate closed".dimmed()
        };
        println!(
            "{} {} {:?} {}{}",
            format!("{:<5}", side).bold(),
            s.readout(),
            s.phase,
            gate,
            if s.invert_y_axis { " (inverted)" } else { "" }
        );
    }
    Ok(())
}

/// Read commands until `quit` or end of input
pub async fn run_repl(host: HostHandle) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Type 'help' for commands.");

    loop {
        // rustyline blocks; keep it off the runtime threads
        let (editor, readline) = tokio::task::spawn_blocking(move || {
            let line = rl.readline(PROMPT);
            (rl, line)
        })
        .await?;
        rl = editor;

        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = rl.add_history_entry(line.as_str());

        match ReplCommand::parse(&line) {
            Ok(ReplCommand::Pointer(event)) => host.pointer(event)?,
            Ok(ReplCommand::Wait(duration)) => tokio::time::sleep(duration).await,
            Ok(ReplCommand::Invert { side, invert }) => host.set_invert_y_axis(side, invert)?,
            Ok(ReplCommand::Status) => print_status(&host).await?,
            Ok(ReplCommand::Help) => print_help(),
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Empty) => {}
            Err(msg) => println!("{}", msg.red()),
        }
    }

    Ok(())
}
