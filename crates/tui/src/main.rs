mod app;
mod config;
mod error;
mod local_state;
mod ui;

use std::{fs, path::Path, sync::Mutex};

use crate::{error::Result, local_state::LocalState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config.log_file, &config.log_level)?;

    let local = match LocalState::load(&config.state_path) {
        Ok(local) => local,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %config.state_path,
                "ignoring unreadable local state"
            );
            LocalState::default()
        }
    };

    let mut app = app::App::new(config, local)?;
    app.run().await?;
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_tracing(log_file: &str, level: &str) -> Result<()> {
    if let Some(parent) = Path::new(log_file).parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bilancio_tui={level},finance_client={level},engine={level}"
        ))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
