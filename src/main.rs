use crate::config::ExportConfig;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod errors;
mod export;
mod listings;
mod reverb;
mod spreadsheets;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reverb_export=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match ExportConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let credential = config.credential.provider();

    match export::run(&config, credential.as_ref()) {
        Ok(outcome) => println!(
            "✅ Export complete: {} ({} listings, {} pages)",
            outcome.path.display(),
            outcome.rows,
            outcome.pages
        ),
        Err(e) => {
            tracing::error!("export failed: {e}");
            eprintln!("❌ Export failed: {e}");
            std::process::exit(1);
        }
    }
}
