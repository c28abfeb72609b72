use clap::Parser;
use read_and_sign::{
    api, init_logger, Cli, DocumentSigner, JsonFileStore, QuotaEnforcer, Settings,
    SigningService, SystemClock,
};
use std::{process::ExitCode, sync::Arc};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::load(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Could not load settings: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logger(settings.log_dir.as_deref(), &settings.log_level);

    if let Err(err) = std::fs::create_dir_all(&settings.output_dir) {
        log::error!(
            "Could not create output directory {}: {}",
            settings.output_dir.display(),
            err
        );
        return ExitCode::FAILURE;
    }
    if !settings.public_dir.is_dir() {
        log::warn!(
            "Document directory {} does not exist, every request will be answered with 404.",
            settings.public_dir.display()
        );
    }

    let service = Arc::new(SigningService::new(
        QuotaEnforcer::new(JsonFileStore::new(&settings.activity_log)),
        DocumentSigner::new(&settings.public_dir),
        &settings.output_dir,
        SystemClock,
    ));
    log::info!(
        "Serving documents from {}, writing signed copies to {}, activity log {}.",
        settings.public_dir.display(),
        settings.output_dir.display(),
        settings.activity_log.display()
    );

    match api::run_server(settings.bind, service, settings.max_body_bytes).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Server stopped: {}", err);
            ExitCode::FAILURE
        }
    }
}
