//! Cleans up a typed command before it is sent to the server.

const EM_DASH: char = '\u{2014}';

/// Replaces every em-dash with `--`.
///
/// Some keyboards turn a typed `--` into an em-dash, which would break flags.
pub fn filter_em_dash(message: &str) -> String {
    message.replace(EM_DASH, "--")
}

/// Normalizes a command for execution on the server.
///
/// The command word is lower-cased and always followed by one space and the
/// rest of the message. The rest is trimmed, except for `/code`, whose
/// argument is kept verbatim.
pub fn normalize_command(message: &str) -> String {
    let message = filter_em_dash(message);
    let (command, rest) = message.split_once(' ').unwrap_or((message.as_str(), ""));
    let command = command.to_lowercase();

    let rest = if command == "/code" { rest } else { rest.trim() };

    format!("{} {}", command, rest)
}
