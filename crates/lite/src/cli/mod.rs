pub mod app;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lite_core::{Config, Operation, Sessions, Upload};

use crate::delivery::DirectoryDelivery;
use crate::ui::table::{Field, Formatter};

pub use app::{App, Commands, Transfer};

pub async fn run(app: App) -> Result<()> {
    let config = Config::load(app.config.as_deref()).context("failed to load configuration")?;

    match app.cmd {
        Commands::Pack(args) => transfer(config, Operation::Pack, &args).await,
        Commands::Unpack(args) => transfer(config, Operation::Recover, &args).await,
        Commands::Inspect(args) => inspect(config, &args.file).await,
        Commands::Config => show_config(&config),
    }
}

async fn transfer(config: Config, operation: Operation, args: &Transfer) -> Result<()> {
    let name = file_name(&args.file)?;
    let upload = stage_upload(&config, &args.file, &name).await?;
    let sessions = Sessions::new(config);
    let delivery = DirectoryDelivery::new(&args.out);

    let delivered = match operation {
        Operation::Pack => sessions.pack(&upload, &delivery).await,
        Operation::Recover => sessions.recover(&upload, &delivery).await,
    }
    .map_err(|e| session_failure(e, operation))?;

    println!("{}", delivery.destination(&delivered.display_name).display());
    Ok(())
}

async fn inspect(config: Config, file: &Path) -> Result<()> {
    let name = file_name(file)?;
    let summary = Sessions::new(config)
        .inspect(&Upload::new(file, name.as_str()))
        .await
        .map_err(|e| session_failure(e, Operation::Recover))?;

    let table = Formatter {
        header: Some(name),
        hide_columns: true,
    }
    .build([
        Field::new("original name", &summary.original_file_name),
        Field::new(
            "recorded extension",
            summary.file_extension.as_deref().unwrap_or("-"),
        ),
        Field::new("detected extension", &summary.detected_extension),
        Field::new(
            "codec",
            summary
                .encoding
                .map_or_else(|| "untagged".to_string(), |e| e.to_string()),
        ),
        Field::new("encoded payload", format!("{} chars", summary.encoded_len)),
        Field::new("entries", summary.entries),
    ]);
    println!("{table}");
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

/// Copy the input into `<root>/uploads/<uuid>`; the session consumes the copy.
async fn stage_upload(config: &Config, file: &Path, name: &str) -> Result<Upload> {
    let uploads = config.uploads_dir();
    tokio::fs::create_dir_all(&uploads)
        .await
        .with_context(|| format!("failed to create '{}'", uploads.display()))?;

    let slot: PathBuf = uploads.join(uuid::Uuid::new_v4().to_string());
    if let Err(e) = tokio::fs::copy(file, &slot).await {
        let _ = tokio::fs::remove_file(&slot).await;
        return Err(e).with_context(|| format!("cannot read '{}'", file.display()));
    }
    tracing::debug!(slot = %slot.display(), "upload staged");
    Ok(Upload::new(slot, name))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' does not name a file", path.display()))
}

fn session_failure(e: lite_core::Error, operation: Operation) -> anyhow::Error {
    let message = e.user_message(operation);
    anyhow::Error::new(e).context(message)
}
