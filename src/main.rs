use clap::Parser;
use qanda::LogLevel;
use qanda::core::config::{self, CliOverrides, QandaConfig};
use qanda::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qanda", about = "Ask questions about your company's documents")]
struct Args {
    /// Backend base URL; `/api/` is appended when missing
    #[arg(long)]
    api_url: Option<String>,

    /// Act as this user instead of the first one the backend lists
    #[arg(long)]
    user_id: Option<String>,

    /// Write logs here instead of ~/.qanda/qanda.log
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let cli = CliOverrides {
        api_url: args.api_url,
        user_id: args.user_id,
        log_file: args.log_file,
    };

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (QandaConfig::default(), Some(e)),
    };

    // Logs go to a file; the terminal belongs to the TUI
    let log_path = config::resolve_log_file(&file_config, &cli);
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&log_path) {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    log::info!("qanda starting up, logging to {}", log_path.display());
    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }

    let resolved = config::resolve(&file_config, &cli);
    tui::run(resolved)
}
