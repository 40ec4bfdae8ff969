use std::{env, fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;

use effectplacer::{placement::Placement, types::SpriteConfig};

mod script;

fn main() -> Result<(), anyhow::Error> {
  if env::var("EFFECT_PLACER_LOG").is_err() {
    env::set_var("EFFECT_PLACER_LOG", "info");
  }
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_env("EFFECT_PLACER_LOG"))
    .with_writer(std::io::stderr)
    .init();

  let Opts { config, placements, format } = Opts::parse();
  println!("{}", run(config, placements, format)?);
  Ok(())
}

fn run(config: PathBuf, placements: PathBuf, format: Format) -> anyhow::Result<String> {
  let cfg: SpriteConfig = load_yaml(&config)?;
  let script: script::Script = load_yaml(&placements)?;
  info!(event = "loaded-placements", config = %config.display(), points = script.points.len());

  let mut placement = Placement::new(cfg, script.mode)?;
  script.apply(&mut placement)?;

  match format {
    Format::Xml => Ok(placement.export()),
    Format::Json => Ok(serde_json::to_string_pretty(placement.points())?),
  }
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
  let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
  serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
  Xml,
  Json,
}

#[derive(Parser)]
#[command(about = "Place sprite effects and print their engine definitions")]
struct Opts {
  /// Sprite geometry, as YAML.
  #[arg(long, value_name = "FILE")]
  config: PathBuf,

  /// The points to place, as YAML.
  #[arg(long, value_name = "FILE")]
  placements: PathBuf,

  #[arg(long, value_enum, default_value_t = Format::Xml)]
  format: Format,
}
