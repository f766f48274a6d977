use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;

use offload_payload::{
    ObjectStorePayloadStore, PayloadStorageConfig, PayloadStorageSettings, PayloadStore,
};
use offload_store::FileSystemObjectStoreClient;
use offload_types::{PayloadReference, ReferenceCodec};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let output = execute(cli, &mut io::stdin().lock())?;
    print!("{output}");
    Ok(())
}

/// Run a command and return what it prints.
pub fn execute(cli: Cli, stdin: &mut dyn Read) -> anyhow::Result<String> {
    let settings = load_settings(&cli)?;
    let client = FileSystemObjectStoreClient::open(&cli.root)
        .with_context(|| format!("cannot open store root {}", cli.root.display()))?;

    match cli.command {
        Command::Init(_) => cmd_init(&client, &settings, &cli.format),
        Command::Store(args) => cmd_store(client, settings, args, stdin, &cli.format),
        Command::Fetch(args) => cmd_fetch(client, settings, args, &cli.format),
        Command::Delete(args) => cmd_delete(client, settings, args, &cli.format),
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<PayloadStorageSettings> {
    let mut settings = match &cli.config {
        Some(path) => PayloadStorageSettings::load(path)
            .with_context(|| format!("cannot load settings from {}", path.display()))?,
        None => PayloadStorageSettings::default(),
    };
    if let Some(bucket) = &cli.bucket {
        settings.bucket_name = bucket.clone();
        settings.enabled = true;
    }
    tracing::debug!(?settings, "payload storage settings");
    Ok(settings)
}

fn build_store(
    client: FileSystemObjectStoreClient,
    settings: PayloadStorageSettings,
) -> anyhow::Result<ObjectStorePayloadStore<FileSystemObjectStoreClient>> {
    let config = PayloadStorageConfig::from_settings(settings).with_client(client);
    Ok(ObjectStorePayloadStore::from_config(config)?)
}

fn cmd_init(
    client: &FileSystemObjectStoreClient,
    settings: &PayloadStorageSettings,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    if settings.bucket_name.is_empty() {
        bail!("no bucket configured; pass --bucket or set bucket_name in the settings file");
    }
    let path = client.create_bucket(&settings.bucket_name)?;
    Ok(match format {
        OutputFormat::Json => format!(
            "{}\n",
            json!({ "bucket": settings.bucket_name, "path": path.display().to_string() })
        ),
        OutputFormat::Text => format!(
            "{} Initialized bucket {} in {}\n",
            "✓".green().bold(),
            settings.bucket_name.yellow(),
            path.display().to_string().bold()
        ),
    })
}

fn cmd_store(
    client: FileSystemObjectStoreClient,
    settings: PayloadStorageSettings,
    args: StoreArgs,
    stdin: &mut dyn Read,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    let payload = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read payload from {}", path.display()))?,
        None => {
            let mut payload = String::new();
            stdin.read_to_string(&mut payload).context("cannot read payload from stdin")?;
            payload
        }
    };

    let store = build_store(client, settings)?;
    let reference = match &args.key {
        Some(key) => store.store_payload_with_key(&payload, key)?,
        None => store.store_payload(&payload)?,
    };
    let parsed = ReferenceCodec::decode(&reference)?;

    Ok(match format {
        OutputFormat::Json => format!(
            "{}\n",
            json!({
                "reference": reference,
                "bucket": parsed.bucket_name(),
                "key": parsed.object_key().as_str(),
                "size": payload.len(),
            })
        ),
        OutputFormat::Text => format!(
            "{reference}\n{} Stored {} bytes as {}\n",
            "✓".green().bold(),
            payload.len().to_string().bold(),
            describe(&parsed).yellow()
        ),
    })
}

fn cmd_fetch(
    client: FileSystemObjectStoreClient,
    settings: PayloadStorageSettings,
    args: FetchArgs,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    let store = build_store(client, settings)?;
    let payload = store.fetch_payload(&args.reference)?;
    Ok(match format {
        OutputFormat::Json => format!("{}\n", json!({ "payload": payload })),
        OutputFormat::Text => payload,
    })
}

fn cmd_delete(
    client: FileSystemObjectStoreClient,
    settings: PayloadStorageSettings,
    args: DeleteArgs,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    let store = build_store(client, settings)?;
    store.delete_payload(&args.reference)?;
    let parsed = ReferenceCodec::decode(&args.reference)?;
    Ok(match format {
        OutputFormat::Json => format!(
            "{}\n",
            json!({
                "deleted": true,
                "bucket": parsed.bucket_name(),
                "key": parsed.object_key().as_str(),
            })
        ),
        OutputFormat::Text => format!(
            "{} Deleted {}\n",
            "✓".green().bold(),
            describe(&parsed).yellow()
        ),
    })
}

fn describe(reference: &PayloadReference) -> String {
    format!("{}/{}", reference.bucket_name(), reference.object_key())
}
