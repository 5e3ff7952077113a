//! Line-oriented command loop for `ghostctl run`.
//!
//! Each input line is one command. A line of bare numbers `X Y [B]` is
//! shorthand for `move X Y [B]`.

use ghostpoint_client::{ClientError, LoopbackTransport, MouseClient};
use ghostpoint_protocol::Buttons;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::CliError;
use crate::output;

pub const HELP: &str = "\
commands:
  move X Y [BUTTONS]   queue a pointer message (also: X Y [BUTTONS])
  clear                drop every queued message
  interval [US]        show or set the poll interval in microseconds
  size                 show the queue depth
  info                 show the device mode and queue capacity
  stats                show device counters
  burst N              queue N unit moves
  help                 show this text
  quit                 remove the device and exit
buttons: a number (0x07 style allowed) or names joined by '+': left+right";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move { x: i32, y: i32, buttons: Buttons },
    Clear,
    Interval(Option<u32>),
    Size,
    Info,
    Stats,
    Burst(u32),
    Help,
    Quit,
}

fn parse_int<T: std::str::FromStr>(word: &str, what: &str) -> Result<T, CliError> {
    word.parse()
        .map_err(|_| CliError::InvalidArgument(format!("{what} must be a number, got '{word}'")))
}

fn parse_buttons(word: &str) -> Result<Buttons, CliError> {
    if let Some(hex) = word.strip_prefix("0x") {
        return u8::from_str_radix(hex, 16)
            .map(Buttons::from_bits)
            .map_err(|_| CliError::InvalidArgument(format!("bad button mask '{word}'")));
    }
    if let Ok(bits) = word.parse::<u8>() {
        return Ok(Buttons::from_bits(bits));
    }

    let mut buttons = Buttons::NONE;
    for name in word.split(['+', ',']) {
        buttons |= match name.to_ascii_lowercase().as_str() {
            "left" | "l" => Buttons::LEFT,
            "right" | "r" => Buttons::RIGHT,
            "middle" | "m" => Buttons::MIDDLE,
            "none" => Buttons::NONE,
            _ => return Err(CliError::InvalidArgument(format!("unknown button '{name}'"))),
        };
    }
    Ok(buttons)
}

fn parse_move(x: &str, y: &str, buttons: Option<&str>) -> Result<Command, CliError> {
    Ok(Command::Move {
        x: parse_int(x, "x")?,
        y: parse_int(y, "y")?,
        buttons: buttons.map_or(Ok(Buttons::NONE), parse_buttons)?,
    })
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CliError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((first, rest)) = words.split_first() else {
            return Ok(None);
        };
        let name = first.to_ascii_lowercase();

        let command = match (name.as_str(), rest) {
            (_, [y]) if first.parse::<i32>().is_ok() => parse_move(first, y, None)?,
            (_, [y, b]) if first.parse::<i32>().is_ok() => parse_move(first, y, Some(*b))?,
            ("move" | "m", [x, y]) => parse_move(x, y, None)?,
            ("move" | "m", [x, y, b]) => parse_move(x, y, Some(*b))?,
            ("clear", []) => Self::Clear,
            ("interval", []) => Self::Interval(None),
            ("interval", [us]) => Self::Interval(Some(parse_int(us, "interval")?)),
            ("size", []) => Self::Size,
            ("info", []) => Self::Info,
            ("stats", []) => Self::Stats,
            ("burst", [n]) => Self::Burst(parse_int(n, "burst count")?),
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => return Err(CliError::UnknownCommand(line.to_string())),
        };
        Ok(Some(command))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Executes commands against one hosted device.
#[derive(Debug)]
pub struct Session {
    client: MouseClient<LoopbackTransport>,
}

impl Session {
    pub fn new(client: MouseClient<LoopbackTransport>) -> Self {
        Self { client }
    }

    pub fn execute(&self, command: Command) -> Result<Reply, CliError> {
        debug!(?command, "executing");
        let text = match command {
            Command::Move { x, y, buttons } => {
                self.client.send_move(x, y, buttons)?;
                "OK".to_string()
            }
            Command::Clear => {
                self.client.clear_queue()?;
                "OK".to_string()
            }
            Command::Interval(None) => format!("interval {}us", self.client.interval()?),
            Command::Interval(Some(us)) => {
                self.client.set_interval(us)?;
                "OK".to_string()
            }
            Command::Size => format!("queue size {}", self.client.queue_size()?),
            Command::Info => output::info_line(&self.client.device_info()),
            Command::Stats => output::stats_block(&self.client.transport().device().stats()),
            Command::Burst(count) => self.burst(count)?,
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn burst(&self, count: u32) -> Result<String, CliError> {
        let (mut accepted, mut full) = (0u32, 0u32);
        for _ in 0..count {
            match self.client.send_move(1, 1, Buttons::NONE) {
                Ok(()) => accepted = accepted.saturating_add(1),
                Err(ClientError::QueueFull) => full = full.saturating_add(1),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(format!("burst: {accepted} accepted, {full} queue full"))
    }
}

/// Run commands from `lines` until `quit` or end of input.
///
/// Errors a user can fix are printed and the loop goes on; anything else
/// ends it.
pub async fn run(session: &Session, lines: &mut mpsc::Receiver<String>) -> Result<(), CliError> {
    while let Some(line) = lines.recv().await {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output::print_error(&e);
                continue;
            }
        };
        match session.execute(command) {
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Quit) => break,
            Err(e) if e.is_recoverable() => output::print_error(&e),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Feed stdin lines into a channel from a plain thread.
///
/// A blocking stdin read cannot be cancelled, so it lives outside the
/// runtime and is simply abandoned at exit.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    let _detached = std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostpoint_device::{DeviceConfig, VirtualMouse};
    use std::sync::Arc;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn session(capacity: usize) -> Result<(Session, Arc<VirtualMouse>), Box<dyn std::error::Error>> {
        let config = DeviceConfig::builder().queue_capacity(capacity).build()?;
        let device = Arc::new(VirtualMouse::new(config)?);
        device.start()?;
        let client = MouseClient::connect(LoopbackTransport::new(Arc::clone(&device)))?;
        Ok((Session::new(client), device))
    }

    #[test]
    fn test_parse_commands() -> TestResult {
        assert_eq!(
            Command::parse("move 3 4 left+middle")?,
            Some(Command::Move {
                x: 3,
                y: 4,
                buttons: Buttons::LEFT | Buttons::MIDDLE
            })
        );
        assert_eq!(
            Command::parse("  5 6 1 ")?,
            Some(Command::Move {
                x: 5,
                y: 6,
                buttons: Buttons::LEFT
            })
        );
        assert_eq!(
            Command::parse("m 1 1 0x06")?,
            Some(Command::Move {
                x: 1,
                y: 1,
                buttons: Buttons::RIGHT | Buttons::MIDDLE
            })
        );
        assert_eq!(Command::parse("interval")?, Some(Command::Interval(None)));
        assert_eq!(
            Command::parse("INTERVAL 9000")?,
            Some(Command::Interval(Some(9000)))
        );
        assert_eq!(Command::parse("burst 12")?, Some(Command::Burst(12)));
        assert_eq!(Command::parse("quit")?, Some(Command::Quit));
        assert_eq!(Command::parse("")?, None);
        assert_eq!(Command::parse("# note")?, None);
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("jump 1 2"),
            Err(CliError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("move 1 two"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            Command::parse("move 1 2 thumb"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            Command::parse("interval -5"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            Command::parse("size now"),
            Err(CliError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_session_commands() -> TestResult {
        let (session, device) = session(8)?;
        assert_eq!(session.execute(Command::Size)?, Reply::Text("queue size 0".into()));

        session.execute(Command::Move {
            x: 1,
            y: 2,
            buttons: Buttons::NONE,
        })?;
        assert_eq!(device.queue_depth(), 1);

        assert_eq!(
            session.execute(Command::Interval(None))?,
            Reply::Text("interval 8000us".into())
        );
        assert!(session.execute(Command::Interval(Some(100))).is_err());
        session.execute(Command::Interval(Some(9000)))?;
        assert_eq!(device.interval_us(), 9000);

        assert_eq!(
            session.execute(Command::Burst(10))?,
            Reply::Text("burst: 6 accepted, 4 queue full".into())
        );
        session.execute(Command::Clear)?;
        assert_eq!(device.queue_depth(), 0);
        assert_eq!(session.execute(Command::Quit)?, Reply::Quit);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_stops_at_quit() -> TestResult {
        let (session, device) = session(16)?;
        let (tx, mut rx) = mpsc::channel(8);
        for line in ["move 1 1", "bogus", "", "2 2 left", "quit", "move 3 3"] {
            tx.send(line.to_string()).await?;
        }
        drop(tx);

        run(&session, &mut rx).await?;
        assert_eq!(device.queue_depth(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_stops_at_end_of_input() -> TestResult {
        let (session, device) = session(16)?;
        let (tx, mut rx) = mpsc::channel(8);
        tx.send("move 1 1".to_string()).await?;
        drop(tx);
        run(&session, &mut rx).await?;
        assert_eq!(device.queue_depth(), 1);
        Ok(())
    }
}
