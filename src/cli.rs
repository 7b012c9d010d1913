use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cfstack",
    version,
    about = "Declare a CloudFront + S3 static site stack and synthesize it"
)]
pub struct Cli {
    /// Path to config file (default: ./cfstack.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the template, asset manifest and staged assets
    Synth {
        /// Output directory (overrides synth.out_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the declared resources and outputs
    List,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Synth { out: None })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn defaults_to_synth_when_command_is_missing() {
        let cli = Cli::parse_from(["cfstack"]);

        assert!(matches!(
            cli.command_or_default(),
            Command::Synth { out: None }
        ));
    }

    #[test]
    fn parses_synth_with_output_dir_and_config() {
        let cli = Cli::parse_from(["cfstack", "synth", "--out", "build", "--config", "site.toml"]);

        match cli.command_or_default() {
            Command::Synth { out } => assert_eq!(
                out.as_deref().map(|p| p.to_string_lossy().to_string()),
                Some("build".to_owned())
            ),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("site.toml".to_owned())
        );
    }

    #[test]
    fn parses_list_command() {
        let cli = Cli::parse_from(["cfstack", "list"]);

        assert!(matches!(cli.command_or_default(), Command::List));
    }
}
