//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use modelrepo_protocol::{Metadata, VERSION_STATUS_READY};

/// Register models and upload their artifacts to the model repository.
#[derive(Parser, Debug)]
#[command(name = "modelrepo", version)]
#[command(about = "Register models and upload artifacts to the model repository")]
pub struct Cli {
    /// Path to the configuration file (default: per-user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a model and optionally upload its artifacts.
    Add(AddArgs),

    /// Update the status of a model version.
    VersionStatus {
        /// Version hash.
        #[arg(long)]
        hash: String,

        /// New status; defaults to marking the version ready.
        #[arg(long, default_value = VERSION_STATUS_READY)]
        status: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Model name.
    #[arg(long)]
    pub name: String,

    /// Credential reference used to pull the model.
    #[arg(long, default_value = "")]
    pub credential_reference: String,

    /// Credential type (e.g. HUGGING_FACE).
    #[arg(long, default_value = "")]
    pub credential_type: String,

    /// Initial model status.
    #[arg(long, default_value = "")]
    pub model_status: String,

    /// Initial version status.
    #[arg(long, default_value = "")]
    pub version_status: String,

    /// Create a multipart upload session for a single artifact.
    #[arg(long)]
    pub create_upload: bool,

    /// Artifact file name for the upload session.
    #[arg(long, default_value = "")]
    pub file_name: String,

    /// Artifact size in bytes.
    #[arg(long)]
    pub file_size: Option<u64>,

    /// Preferred part size in bytes; the service may pick another.
    #[arg(long)]
    pub part_size: Option<u64>,

    /// Artifact content type.
    #[arg(long, default_value = "")]
    pub content_type: String,

    /// Directory whose files are uploaded, one session per file.
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Metadata entry as key=value; repeatable.
    #[arg(long = "metadata", value_parser = parse_key_val)]
    pub metadata: Vec<(String, String)>,
}

impl AddArgs {
    /// Whether any upload-related flag was given.
    pub fn wants_upload(&self) -> bool {
        self.create_upload
            || !self.file_name.trim().is_empty()
            || self.file_size.is_some()
            || self.part_size.is_some()
            || !self.content_type.trim().is_empty()
            || !self.metadata.is_empty()
    }

    pub fn metadata(&self) -> Metadata {
        self.metadata
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect()
    }
}

/// Parses a `key=value` pair. The key is trimmed and must not be empty.
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid metadata entry {raw:?}, expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid metadata entry {raw:?}, key is empty"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("source = hf=mirror").unwrap(),
            ("source".to_string(), "hf=mirror".to_string())
        );
    }

    #[test]
    fn key_val_rejects_bad_entries() {
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val(" =x").is_err());
    }

    #[test]
    fn parses_add_with_upload_flags() {
        let cli = Cli::try_parse_from([
            "modelrepo",
            "add",
            "--name",
            "llama",
            "--model-path",
            "/models/llama",
            "--metadata",
            "framework=pytorch",
            "--part-size",
            "1024",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.name, "llama");
        assert_eq!(args.part_size, Some(1024));
        assert!(args.wants_upload());
        assert_eq!(args.metadata()["framework"], "pytorch");
    }

    #[test]
    fn plain_add_does_not_upload() {
        let cli = Cli::try_parse_from(["modelrepo", "add", "--name", "llama"]).unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert!(!args.wants_upload());
    }

    #[test]
    fn version_status_parses() {
        let cli = Cli::try_parse_from([
            "modelrepo",
            "--config",
            "/tmp/c.toml",
            "version-status",
            "--hash",
            "h1",
            "--status",
            "READY",
        ])
        .unwrap();
        assert_eq!(cli.config.unwrap().to_str(), Some("/tmp/c.toml"));
        assert!(matches!(cli.command, Command::VersionStatus { ref hash, .. } if hash == "h1"));
    }

    #[test]
    fn version_status_defaults_to_ready() {
        let cli = Cli::try_parse_from(["modelrepo", "version-status", "--hash", "h1"]).unwrap();
        let Command::VersionStatus { status, .. } = cli.command else {
            panic!("expected version-status");
        };
        assert_eq!(status, "READY");
    }
}
