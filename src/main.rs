use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod error;
mod io;
mod operators;
mod runtime;

use config::{OutputFormat, RankingConfig};

#[derive(Parser, Debug)]
#[command(name = "popu-rank")]
#[command(about = "Ranks prefectures by population change between two census years", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Rank the regions of a population CSV (default)
    Run(RunArgs),
    /// Validate a ranking configuration
    Validate {
        /// Path to ranking YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show version information
    Version,
}

#[derive(Args, Debug, Default, PartialEq)]
struct RunArgs {
    /// Path to the population CSV (overrides the config file)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Path to ranking YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// How the ranking is printed
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Write a JSON run manifest to this path
    #[arg(short, long)]
    manifest: Option<PathBuf>,
}

impl RunArgs {
    fn into_config(self) -> anyhow::Result<RankingConfig> {
        let mut config = match &self.config {
            Some(path) => RankingConfig::from_yaml_file(path)?,
            None => RankingConfig::default(),
        };
        if let Some(input) = self.input {
            config.input.path = input.to_string_lossy().to_string();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(manifest) = self.manifest {
            config.output.manifest = Some(manifest.to_string_lossy().to_string());
        }
        Ok(config)
    }
}

fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let config = args.into_config()?;
            let run = runtime::run_ranking(&config)?;
            println!("{}", operators::emit(&run.ranking, config.output.format)?);
        }
        Commands::Validate { config } => {
            let _config = RankingConfig::from_yaml_file(&config)?;
            println!("✓ Ranking configuration is valid");
        }
        Commands::Version => {
            println!("popu-rank version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_runs_with_defaults() {
        let cli = Cli::try_parse_from(["popu-rank"]).unwrap();
        assert_eq!(cli.command, None);

        let config = RunArgs::default().into_config().unwrap();
        assert_eq!(config, RankingConfig::default());
    }

    #[test]
    fn run_flags_override_config() {
        let cli = Cli::try_parse_from([
            "popu-rank", "run", "-i", "data/popu.csv", "--format", "lines", "-m", "m.json",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };

        let config = args.into_config().unwrap();
        assert_eq!(config.input.path, "data/popu.csv");
        assert_eq!(config.output.format, OutputFormat::Lines);
        assert_eq!(config.output.manifest.as_deref(), Some("m.json"));
        assert_eq!(config.years, RankingConfig::default().years);
    }

    #[test]
    fn run_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.yaml");
        std::fs::write(&path, "input:\n  path: other.csv\noutput:\n  format: pretty\n").unwrap();

        let args = RunArgs {
            config: Some(path),
            ..RunArgs::default()
        };
        let config = args.into_config().unwrap();
        assert_eq!(config.input.path, "other.csv");
        assert_eq!(config.output.format, OutputFormat::Pretty);
    }

    #[test]
    fn validate_requires_config() {
        assert!(Cli::try_parse_from(["popu-rank", "validate"]).is_err());
        let cli = Cli::try_parse_from(["popu-rank", "validate", "-c", "r.yaml"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Validate {
                config: PathBuf::from("r.yaml")
            })
        );
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["popu-rank", "run", "--format", "xml"]).is_err());
    }
}
