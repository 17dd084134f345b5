use driveprobe::config::ProbeConfig;
use driveprobe::{ensure_windows_host, shell, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Refuse to start anywhere the physical drive namespace does not exist
    if let Err(err) = ensure_windows_host() {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    env_logger::init();

    let config = match ProbeConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("using default configuration: {}", err);
            ProbeConfig::default()
        }
    };

    shell::run_menu(&config).await
}
