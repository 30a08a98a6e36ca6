//! Command handlers: wire the clients into the upload pipeline.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use modelrepo_client::{Client, ObjectStoreClient};
use modelrepo_protocol::AddModelInput;
use modelrepo_uploader::{
    BatchOrchestrator, FileUploadResult, SessionTemplate, UploadCandidate, UploadEvent,
    create_session, enumerate_files,
};
use tracing::{debug, info, warn};

use crate::adapter::{ObjectStoreAdapter, RepositoryAdapter};
use crate::cli::{AddArgs, Cli, Command};
use crate::config::Config;

/// Runs the selected subcommand to completion.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Command::Add(args) => add(args, &config).await,
        Command::VersionStatus { hash, status } => version_status(&hash, &status, &config).await,
    }
}

/// What `add` does after registering the model.
#[derive(Debug)]
enum UploadMode {
    /// Register only.
    None,
    /// Create one session and print it; the caller uploads the bytes.
    Session { file_name: String, file_size: u64 },
    /// Upload every file under the directory.
    Directory(Vec<UploadCandidate>),
}

/// Decides the upload mode from the flags, checking everything that can be
/// checked locally before any network call.
fn upload_mode(args: &AddArgs) -> anyhow::Result<UploadMode> {
    if let Some(path) = &args.model_path {
        return Ok(UploadMode::Directory(scan_model_path(path)?));
    }
    if !args.wants_upload() {
        return Ok(UploadMode::None);
    }

    let file_name = args.file_name.trim();
    if file_name.is_empty() {
        bail!("file-name is required when creating an upload");
    }
    let Some(file_size) = args.file_size else {
        bail!("file-size is required when creating an upload");
    };
    Ok(UploadMode::Session {
        file_name: file_name.to_string(),
        file_size,
    })
}

fn scan_model_path(path: &Path) -> anyhow::Result<Vec<UploadCandidate>> {
    let meta = std::fs::metadata(path).context("unable to read model directory")?;
    if !meta.is_dir() {
        bail!("model-path \"{}\" must be a directory", path.display());
    }
    let files = enumerate_files(path).context("scan model directory")?;
    if files.is_empty() {
        bail!(
            "model-path \"{}\" does not contain any files to upload",
            path.display()
        );
    }
    Ok(files)
}

fn session_template(args: &AddArgs) -> SessionTemplate {
    SessionTemplate {
        name: args.name.clone(),
        part_size_hint: args.part_size,
        content_type: args.content_type.clone(),
        credential_type: args.credential_type.clone(),
        credential_reference: args.credential_reference.clone(),
        metadata: args.metadata(),
    }
}

async fn add(args: AddArgs, config: &Config) -> anyhow::Result<()> {
    let client = Client::new(&config.api_url, &config.api_key, config.request_timeout())?;
    let mode = upload_mode(&args)?;

    let input = AddModelInput {
        name: args.name.clone(),
        credential_type: args.credential_type.clone(),
        credential_reference: args.credential_reference.clone(),
        model_status: args.model_status.clone(),
        version_status: args.version_status.clone(),
        metadata: args.metadata(),
    };
    let model = client.add_model(&input).await?;
    println!(
        "model \"{}\" registered with Model Repo (id: {})",
        model.name, model.id
    );

    let template = session_template(&args);
    let repo = RepositoryAdapter::new(client);

    match mode {
        UploadMode::None => Ok(()),
        UploadMode::Session {
            file_name,
            file_size,
        } => {
            let input = template.create_input(&file_name, file_size);
            let negotiated = create_session(&repo, &input).await?;
            let json = serde_json::to_string_pretty(&negotiated.session)?;
            println!("multipart upload session created:\n{json}");
            Ok(())
        }
        UploadMode::Directory(files) => {
            let store = ObjectStoreClient::new(config.request_timeout())?;
            let results = upload_directory(
                Arc::new(repo),
                Arc::new(ObjectStoreAdapter::new(store)),
                config,
                &files,
                &template,
            )
            .await?;
            for result in &results {
                println!(
                    "model artifact \"{}\" uploaded to {} (session {} status: {})",
                    result.relative_path, result.key, result.session_id, result.status
                );
            }
            Ok(())
        }
    }
}

async fn upload_directory(
    repo: Arc<RepositoryAdapter>,
    store: Arc<ObjectStoreAdapter>,
    config: &Config,
    files: &[UploadCandidate],
    template: &SessionTemplate,
) -> anyhow::Result<Vec<FileUploadResult>> {
    let mut orchestrator = BatchOrchestrator::new(repo, store, config.upload_options());

    let mut events = orchestrator
        .take_events()
        .context("upload event channel already taken")?;
    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            report(&event);
        }
    });

    let cancel = orchestrator.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling upload");
            cancel.cancel();
        }
    });

    let outcome = orchestrator.upload_all(files, template).await;
    interrupt.abort();
    // Closes the event channel so the reporter drains and exits.
    drop(orchestrator);
    let _ = reporter.await;

    Ok(outcome?)
}

fn report(event: &UploadEvent) {
    match event {
        UploadEvent::FileStarted { path, size_bytes } => {
            info!(file = %path, size_bytes, "uploading");
        }
        UploadEvent::SessionCreated {
            path,
            session_id,
            parts,
            part_size,
        } => {
            debug!(file = %path, %session_id, parts, part_size, "session created");
        }
        UploadEvent::PartUploaded {
            path,
            part_number,
            uploaded_bytes,
            total_bytes,
            bytes_per_second,
            eta,
            ..
        } => {
            info!(
                file = %path,
                part = part_number,
                progress = %format!("{uploaded_bytes}/{total_bytes}"),
                speed = %format!("{:.1} MiB/s", bytes_per_second / (1024.0 * 1024.0)),
                eta_secs = eta.map(|d| d.as_secs()),
                "part uploaded"
            );
        }
        UploadEvent::FileCompleted { .. } | UploadEvent::Failed { .. } => {}
    }
}

async fn version_status(hash: &str, status: &str, config: &Config) -> anyhow::Result<()> {
    let client = Client::new(&config.api_url, &config.api_key, config.request_timeout())?;
    let version = client.update_version_status(hash, status).await?;
    println!(
        "model version {} status updated to {}",
        if version.hash.is_empty() { hash } else { version.hash.as_str() },
        version.status
    );
    Ok(())
}
