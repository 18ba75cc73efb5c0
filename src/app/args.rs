use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "chat-commands")]
#[command(about = "Run slash commands and open chat links from a console")]
pub struct AppArgs {
    #[arg(long, help = "Config file path (JSON)")]
    pub config: Option<String>,

    #[arg(long, default_value = "data", help = "Data directory")]
    pub data_dir: String,

    #[arg(long, help = "Server URL to start on (overrides the config's active server)")]
    pub server: Option<String>,

    #[arg(long, help = "Channel id to start in")]
    pub channel: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = AppArgs::try_parse_from([
            "chat-commands",
            "--server",
            "https://chat.example.com",
            "--channel",
            "c1",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.server.as_deref(), Some("https://chat.example.com"));
        assert_eq!(args.channel.as_deref(), Some("c1"));
        assert_eq!(args.data_dir, "data");
        assert!(args.verbose);
    }
}
