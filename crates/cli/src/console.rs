use std::str::FromStr;

pub const HELP: &str = "Commands: start [FRAMES] | stop | status | help | quit";

/// One line typed at the interactive capture prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start(Option<u32>),
    Stop,
    Status,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().map(str::to_lowercase);
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(format!("Unexpected argument '{extra}'"));
        }

        match (command.as_deref(), argument) {
            (Some("start"), None) => Ok(ConsoleCommand::Start(None)),
            (Some("start"), Some(frames)) => frames
                .parse::<u32>()
                .map(|n| ConsoleCommand::Start(Some(n)))
                .map_err(|_| format!("Frame count must be a whole number, got '{frames}'")),
            (Some("stop"), None) => Ok(ConsoleCommand::Stop),
            (Some("status"), None) => Ok(ConsoleCommand::Status),
            (Some("help") | Some("?"), None) => Ok(ConsoleCommand::Help),
            (Some("quit") | Some("exit") | Some("q"), None) => Ok(ConsoleCommand::Quit),
            (Some(cmd), Some(_)) => Err(format!("'{cmd}' takes no argument")),
            (Some(cmd), None) => Err(format!("Unknown command '{cmd}'. {HELP}")),
            (None, _) => Err(HELP.to_string()),
        }
    }
}
