use clap::Parser;
use coach::core::config::{self, CliOverrides, CoachConfig};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

const LOG_FILE: &str = "coach.log";

#[derive(Parser)]
#[command(name = "coach", about = "Health and wellness coach in your terminal")]
struct Args {
    /// Model name sent with each request (omit to let the endpoint choose)
    #[arg(short, long)]
    model: Option<String>,

    /// Chat-completions base URL, e.g. http://localhost:1234/v1
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds to wait for response headers and for each streamed chunk
    #[arg(long)]
    timeout: Option<u64>,

    /// Initial skin type (oily, dry, combination, sensitive, normal)
    #[arg(long)]
    skin_type: Option<String>,

    /// Initial fitness goal (weightLoss, muscleGain, endurance, flexibility, general)
    #[arg(long)]
    fitness_goal: Option<String>,

    /// Initial activity level (sedentary, light, moderate, very, extreme)
    #[arg(long)]
    activity_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            model: args.model,
            base_url: args.base_url,
            timeout_secs: args.timeout,
            skin_type: args.skin_type,
            fitness_goal: args.fitness_goal,
            activity_level: args.activity_level,
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli: CliOverrides = Args::parse().into();
    dotenv::dotenv().ok();

    // The log level comes from the config file, so load it before the logger exists
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (CoachConfig::default(), Some(e)),
    };
    let resolved = config::resolve(&file_config, &cli);

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(LOG_FILE) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Falling back to default config: {}", e);
    }
    log::info!(
        "Coach starting up: base_url={}, model={}, timeout={:?}",
        resolved.base_url,
        resolved.display_model(),
        resolved.request_timeout
    );

    coach::tui::run(resolved)
}
