use std::path::PathBuf;

use chrono::NaiveDate;

use crate::square::Size;

mod generate;
pub use generate::generate;

mod play;
pub use play::play;

/// Daily word squares in the terminal.
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "wordsquare", version)]
pub struct Cli {
    /// Config file; must exist when given.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a puzzle without playing it.
    Generate(Generate),

    /// Play a daily puzzle, resuming any saved progress.
    Play(Play),

    /// Print the resolved configuration.
    Config,
}

#[derive(clap::Args, Debug, Clone)]
pub struct Generate {
    #[arg(long, short, default_value_t = Size::Five)]
    pub size: Size,

    /// Day of the puzzle, today if neither this nor --seed is given.
    #[arg(long, conflicts_with = "seed")]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the grid and its answer as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct Play {
    #[arg(long, short, default_value_t = Size::Five)]
    pub size: Size,

    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::{Cli, Command};
    use crate::square::Size;

    #[test]
    fn generate_args() {
        let cli = Cli::try_parse_from([
            "wordsquare",
            "generate",
            "--size",
            "6",
            "--date",
            "2024-03-01",
            "--json",
        ])
        .unwrap();

        let Command::Generate(generate) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(generate.size, Size::Six);
        assert_eq!(generate.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(generate.json);
    }

    #[test]
    fn date_and_seed_conflict() {
        assert!(Cli::try_parse_from([
            "wordsquare",
            "generate",
            "--date",
            "2024-03-01",
            "--seed",
            "4"
        ])
        .is_err());
    }

    #[test]
    fn unplayable_size() {
        assert!(Cli::try_parse_from(["wordsquare", "play", "--size", "7"]).is_err());
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["wordsquare", "play", "--config", "other.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("other.toml")));
        assert!(matches!(cli.command, Command::Play(..)));
    }
}
