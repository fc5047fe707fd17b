// command.rs - Control commands and the channel that carries them to the engine

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::error::{ChannelClosed, CommandParseError};

/// A control command from an external controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a rule from the catalog by name.
    SetRule(String),
    /// Toggle between running and paused.
    Pause,
    /// Pause, and advance exactly one generation on the next frame.
    Step,
    /// Clear the grid.
    Reset,
    /// Stop the run loop after the current frame.
    Quit,
}

impl FromStr for Command {
    type Err = CommandParseError;

    /// Accepts `rule <name>`, `pause`, `step`, `reset` and `quit`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (s, ""),
        };

        match (verb, arg) {
            ("rule" | "set_rule", name) if !name.is_empty() => Ok(Command::SetRule(name.to_string())),
            ("pause", "") => Ok(Command::Pause),
            ("step", "") => Ok(Command::Step),
            ("reset", "") => Ok(Command::Reset),
            ("quit", "") => Ok(Command::Quit),
            _ => Err(CommandParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetRule(name) => write!(f, "rule {name}"),
            Command::Pause => f.write_str("pause"),
            Command::Step => f.write_str("step"),
            Command::Reset => f.write_str("reset"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// Anything the engine can drain commands from once per frame.
///
/// `drain` must return every command that is already available, oldest
/// first, and must never wait for new ones.
pub trait CommandSource {
    fn drain(&mut self) -> Vec<Command>;
}

impl CommandSource for VecDeque<Command> {
    fn drain(&mut self) -> Vec<Command> {
        VecDeque::drain(self, ..).collect()
    }
}

/// Creates a connected sender/receiver pair.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        CommandSender { tx },
        CommandReceiver {
            rx,
            disconnected: false,
        },
    )
}

/// Controller side of the channel. Cloning gives another producer.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: UnboundedSender<Command>,
}

impl CommandSender {
    pub fn send(&self, command: Command) -> Result<(), ChannelClosed> {
        self.tx.send(command).map_err(|_| ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Engine side of the channel.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: UnboundedReceiver<Command>,
    disconnected: bool,
}

impl CommandReceiver {
    /// True once every sender has been dropped and the queue is empty.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl CommandSource for CommandReceiver {
    fn drain(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(command) => commands.push(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        tracing::debug!("all command senders dropped");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_textual_commands() {
        assert_eq!("rule life".parse(), Ok(Command::SetRule("life".into())));
        assert_eq!("set_rule  34life ".parse(), Ok(Command::SetRule("34life".into())));
        assert_eq!("pause".parse(), Ok(Command::Pause));
        assert_eq!(" step".parse(), Ok(Command::Step));
        assert_eq!("reset".parse(), Ok(Command::Reset));
        assert_eq!("quit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_unknown_or_malformed_commands() {
        assert!("rule".parse::<Command>().is_err());
        assert!("pause now".parse::<Command>().is_err());
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandParseError("jump".into()))
        );
    }

    #[test]
    fn display_round_trips() {
        for command in [
            Command::SetRule("highlife".into()),
            Command::Pause,
            Command::Step,
            Command::Reset,
            Command::Quit,
        ] {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
    }

    #[test]
    fn drain_is_fifo_and_non_blocking() {
        let (tx, mut rx) = command_channel();
        assert!(rx.drain().is_empty());

        tx.send(Command::Pause).unwrap();
        tx.send(Command::SetRule("life".into())).unwrap();
        tx.clone().send(Command::Step).unwrap();

        assert_eq!(
            rx.drain(),
            vec![Command::Pause, Command::SetRule("life".into()), Command::Step]
        );
        assert!(rx.drain().is_empty());
        assert!(!rx.is_disconnected());
    }

    #[test]
    fn dropped_senders_are_noticed_after_queue_empties() {
        let (tx, mut rx) = command_channel();
        tx.send(Command::Quit).unwrap();
        drop(tx);

        assert_eq!(rx.drain(), vec![Command::Quit]);
        assert!(rx.is_disconnected());
    }

    #[test]
    fn send_fails_once_receiver_is_gone() {
        let (tx, rx) = command_channel();
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(tx.send(Command::Reset), Err(ChannelClosed));
    }

    #[test]
    fn queue_source_drains_in_order() {
        let mut queue: VecDeque<Command> = [Command::Reset, Command::Quit].into();
        assert_eq!(CommandSource::drain(&mut queue), vec![Command::Reset, Command::Quit]);
        assert!(queue.is_empty());
    }
}
