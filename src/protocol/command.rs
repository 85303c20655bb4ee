use std::fmt;

/// A line the bot sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Nick(String),
    User { username: String, realname: String },
    /// One or more channels, joined with commas on the wire.
    Join(Vec<String>),
    Pong(Option<String>),
    Privmsg { target: String, text: String },
    Quit(Option<String>),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Nick(name) => write!(f, "NICK {name}"),
            Command::User { username, realname } => write!(f, "USER {username} 0 * :{realname}"),
            Command::Join(channels) => write!(f, "JOIN {}", channels.join(",")),
            Command::Pong(Some(token)) => write!(f, "PONG {token}"),
            Command::Pong(None) => f.write_str("PONG"),
            Command::Privmsg { target, text } => write!(f, "PRIVMSG {target} :{text}"),
            Command::Quit(Some(reason)) => write!(f, "QUIT :{reason}"),
            Command::Quit(None) => f.write_str("QUIT"),
        }
    }
}

impl Command {
    /// Wire bytes including the CRLF terminator.
    pub fn to_wire(&self) -> Vec<u8> {
        format!("{self}\r\n").into_bytes()
    }
}
