use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use std::path::PathBuf;
use tracing::{debug, warn};
use weatherview_core::{
    Config, SourceId, TemperatureUnit, WeatherSource, WeatherView,
    source::{default_source_from_config, file::FileSource, source_from_config},
};

/// Input that toggles between °C and °F in interactive mode.
const TOGGLE: &str = ":u";
/// Input that leaves interactive mode.
const QUIT: &str = ":q";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherview", version, about = "Current weather for a city")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to read weather from, overriding the config file.
#[derive(Debug, clap::Args)]
pub struct SourceArgs {
    /// Source short name, "openweather" or "file".
    #[arg(long, conflicts_with = "file")]
    source: Option<String>,

    /// Read weather from this JSON file instead of a live source.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Show temperatures in Fahrenheit.
    #[arg(long)]
    fahrenheit: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a weather source.
    Configure {
        /// Source short name, "openweather" or "file".
        source: String,
    },

    /// Show the weather for a city once.
    Show {
        /// City name.
        city: String,

        #[command(flatten)]
        args: SourceArgs,
    },

    /// Search cities one after another.
    Interactive {
        #[command(flatten)]
        args: SourceArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { source } => {
                configure(Config::load()?, SourceId::try_from(source.as_str())?)
            }
            Command::Show { city, args } => {
                let mut view = open_view(&args, Config::load)?;
                view.set_city(city);
                view.submit().await;
                print!("{}", view.screen());
                Ok(())
            }
            Command::Interactive { args } => interactive(open_view(&args, Config::load)?).await,
        }
    }
}

/// Build the view. With `--file` the config only supplies the default unit,
/// so a broken config file is logged and skipped instead of failing.
fn open_view(
    args: &SourceArgs,
    load: impl FnOnce() -> anyhow::Result<Config>,
) -> anyhow::Result<WeatherView> {
    let (source, config): (Box<dyn WeatherSource>, Config) = match (&args.file, &args.source) {
        (Some(path), _) => {
            let config = load().unwrap_or_else(|e| {
                warn!(error = format!("{e:#}"), "ignoring unusable config file");
                Config::default()
            });
            let source: Box<dyn WeatherSource> = Box::new(FileSource::new(path));
            (source, config)
        }
        (None, Some(id)) => {
            let config = load()?;
            (source_from_config(SourceId::try_from(id.as_str())?, &config)?, config)
        }
        (None, None) => {
            let config = load()?;
            (default_source_from_config(&config)?, config)
        }
    };
    debug!(?source, "weather source ready");

    let unit = if args.fahrenheit { TemperatureUnit::Fahrenheit } else { config.default_unit };

    Ok(WeatherView::new(source, unit))
}

async fn interactive(mut view: WeatherView) -> anyhow::Result<()> {
    print!("{}", view.screen());

    loop {
        let input = Text::new("City:")
            .with_help_message(&format!("{TOGGLE} toggles °C/°F, {QUIT} quits"))
            .prompt();

        let input = match input {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        match input.trim() {
            QUIT => break,
            TOGGLE => view.toggle_unit(),
            _ => {
                view.set_city(input);
                // Blank input is ignored and just redraws.
                view.submit().await;
            }
        }

        print!("{}", view.screen());
    }

    Ok(())
}

fn configure(mut config: Config, id: SourceId) -> anyhow::Result<()> {
    match id {
        SourceId::OpenWeather => {
            let key = Password::new("OpenWeather API key:")
                .without_confirmation()
                .prompt()
                .context("Failed to read API key")?;
            config.set_openweather_key(key.trim().to_string());
        }
        SourceId::File => {
            let path = Text::new("Path to weather JSON file:")
                .prompt()
                .context("Failed to read file path")?;
            config.set_file_path(PathBuf::from(path.trim()));
        }
    }

    let unit = Select::new("Default temperature unit:", TemperatureUnit::all().to_vec())
        .prompt()
        .context("Failed to read temperature unit")?;

    config.default_unit = unit;
    config.set_source(id);

    let path = config.save()?;
    println!("Saved {id} configuration to {}", path.display());

    Ok(())
}
