use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use skybars_core::{
    Config, DisplayModel, Surface, TemperatureScale, WeatherProvider, provider_from_config,
};
use tracing::info;

use crate::{
    app::{self, App, Pacing},
    report,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skybars", version, about = "Weather bars for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, default city and scale.
    Configure,

    /// Fetch once and print the bars as text.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// celsius or fahrenheit; defaults to the configured scale.
        #[arg(long, short)]
        scale: Option<TemperatureScale>,
    },

    /// Full-screen widget that repaints continuously.
    Watch {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// celsius or fahrenheit; defaults to the configured scale.
        #[arg(long, short)]
        scale: Option<TemperatureScale>,

        /// Seconds between automatic re-fetches; 0 disables.
        #[arg(long)]
        refresh: Option<u64>,
    },
}

impl Command {
    /// The full-screen widget owns the terminal, so its logs go to a file.
    pub fn logs_to_file(&self) -> bool {
        matches!(self, Command::Watch { .. })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, scale } => {
                let cfg = Config::load()?;
                let provider = provider_from_config(&cfg)?;
                let city = city.unwrap_or_else(|| cfg.default_city.clone());
                show(provider.as_ref(), &city, scale.unwrap_or(cfg.scale)).await
            }
            Command::Watch {
                city,
                scale,
                refresh,
            } => {
                let cfg = Config::load()?;
                let provider: Arc<dyn WeatherProvider> = provider_from_config(&cfg)?.into();
                let city = city.unwrap_or_else(|| cfg.default_city.clone());
                let refresh_secs = refresh.unwrap_or(cfg.refresh_secs);
                let pacing = Pacing {
                    frame: Duration::from_millis(cfg.frame_ms.max(1)),
                    refresh: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
                };

                info!(city = %city, ?pacing, "Starting widget");
                let app = App::new(provider, scale.unwrap_or(cfg.scale));
                app::run_in_terminal(app, &city, pacing).await
            }
        }
    }
}

async fn show(
    provider: &dyn WeatherProvider,
    city: &str,
    scale: TemperatureScale,
) -> anyhow::Result<()> {
    let mut model = DisplayModel::new(scale);
    let ticket = model.begin_request(city);

    let observation = provider
        .fetch_observation(city)
        .await
        .with_context(|| format!("Failed to fetch weather for '{city}'"))?;
    model.apply(ticket, Ok(observation));

    print!("{}", report::render(&model, Surface::default()));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let prompt = if cfg.is_configured() {
        "OpenWeather API key (leave empty to keep the current one):"
    } else {
        "OpenWeather API key:"
    };
    let api_key = Password::new(prompt)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        cfg.set_api_key(api_key);
    }
    if !cfg.is_configured() {
        anyhow::bail!("An API key is required. Get one at https://openweathermap.org/api");
    }

    cfg.default_city = Text::new("Default city:")
        .with_default(&cfg.default_city)
        .prompt()
        .context("Failed to read default city")?;

    let scales = TemperatureScale::all().to_vec();
    let start = scales.iter().position(|s| *s == cfg.scale).unwrap_or(0);
    cfg.scale = Select::new("Temperature scale:", scales)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature scale")?;

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
