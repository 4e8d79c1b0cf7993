use clap::Parser;
use courier::core::config::{self, CliOverrides};
use courier::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File};

#[derive(Parser)]
#[command(name = "courier", about = "Terminal messaging client")]
struct Args {
    /// Auth endpoint URL (overrides config and COURIER_AUTH_URL)
    #[arg(long)]
    auth_url: Option<String>,

    /// Chats endpoint URL (overrides config and COURIER_CHATS_URL)
    #[arg(long)]
    chats_url: Option<String>,

    /// Directory for the stored session and the log file
    #[arg(long)]
    state_dir: Option<String>,

    /// Keep the session in memory only
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            config::CourierConfig::default()
        }
    };
    let cli = CliOverrides {
        auth_url: args.auth_url,
        chats_url: args.chats_url,
        state_dir: args.state_dir,
        no_persist: args.no_persist,
    };
    let resolved = match config::resolve(&file_config, &cli) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    // File logger - the terminal belongs to the UI
    fs::create_dir_all(&resolved.state_dir)?;
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(resolved.log_path()) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!(
        "Courier starting up (auth: {}, chats: {})",
        resolved.auth_url,
        resolved.chats_url
    );

    tui::run(resolved)
}
