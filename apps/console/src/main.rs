use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use console_core::{
    dashboard, property_form, FileKeyValueStore, HttpRemoteService, ImageAttachment, NoticeKind,
    PropertyDraft, RemoteService, SessionGate, TableController, ViewConfig,
};
use shared::{
    domain::{RecordId, RecordKind},
    error::ConsoleError,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "staff_console", about = "Staff console for listings and customer requests")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Dashboard,
    List {
        kind: RecordKind,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    SetStatus {
        kind: RecordKind,
        id: String,
        status: String,
    },
    Detail {
        kind: RecordKind,
        id: String,
    },
    AddProperty {
        /// `name=value`, repeated for each form field.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    Ok((name.trim().to_string(), value.to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }

    let session_path = settings.session_path()?;
    debug!(path = %session_path.display(), "opening session store");
    let mut gate = SessionGate::new(FileKeyValueStore::open(&session_path), settings.credential());

    match &cli.command {
        Command::Login { username, password } => {
            gate.login(username, password)?;
            println!("Signed in as {username}");
            return Ok(());
        }
        Command::Logout => {
            gate.logout()?;
            println!("Signed out");
            return Ok(());
        }
        _ => {}
    }
    if !gate.is_authenticated() {
        bail!("not signed in; run `staff_console login` first");
    }

    let remote: Arc<dyn RemoteService> = Arc::new(HttpRemoteService::with_timeout(
        &settings.api_base_url,
        settings.request_timeout(),
    )?);
    info!(api = %settings.api_base_url, "console ready");

    match cli.command {
        Command::Login { .. } | Command::Logout => Ok(()),
        Command::Dashboard => {
            let dashboard = dashboard::load(remote.as_ref()).await;
            println!("{}", render::dashboard(&dashboard));
            Ok(())
        }
        Command::List { kind, query, page } => list(remote, kind, query, page).await,
        Command::SetStatus { kind, id, status } => set_status(remote, kind, id, &status).await,
        Command::Detail { kind, id } => detail(remote, kind, id).await,
        Command::AddProperty { fields, images } => add_property(remote, fields, images).await,
    }
}

async fn load_view(remote: Arc<dyn RemoteService>, kind: RecordKind) -> TableController {
    let mut controller = TableController::new(ViewConfig::for_kind(kind), remote);
    controller.activate();
    controller.settle().await;
    if let Some(err) = controller.last_fetch_error() {
        eprintln!("Could not refresh {}: {}", kind.label(), err.user_message());
    }
    controller
}

async fn list(remote: Arc<dyn RemoteService>, kind: RecordKind, query: String, page: usize) -> Result<()> {
    let mut controller = load_view(remote, kind).await;
    controller.set_query(query);
    for _ in 1..page {
        if !controller.next_page() {
            break;
        }
    }
    println!("{}", render::table(&controller.view()));
    Ok(())
}

async fn set_status(
    remote: Arc<dyn RemoteService>,
    kind: RecordKind,
    id: String,
    status: &str,
) -> Result<()> {
    let mut controller = load_view(remote, kind).await;
    let id = RecordId::new(id);
    if !controller.start_edit(&id) {
        bail!("no {} record with id {id}", kind.label());
    }
    if !controller.set_pending_status(status) {
        let messages: Vec<_> = controller
            .take_notices()
            .into_iter()
            .map(|notice| notice.message)
            .collect();
        bail!("{}", messages.join("; "));
    }
    controller.save();
    controller.settle().await;

    if let Some(notice) = controller
        .take_notices()
        .into_iter()
        .find(|notice| notice.kind == NoticeKind::SaveFailed)
    {
        bail!("{}", notice.message);
    }
    let committed = controller
        .snapshot()
        .iter()
        .find(|record| record.id == id)
        .map(|record| controller.config().status_of(record))
        .unwrap_or(status);
    println!("{} {id} is now {committed}", kind.label());
    Ok(())
}

async fn detail(remote: Arc<dyn RemoteService>, kind: RecordKind, id: String) -> Result<()> {
    let mut controller = load_view(remote, kind).await;
    let id = RecordId::new(id);
    if !controller.snapshot().iter().any(|record| record.id == id) {
        bail!("no {} record with id {id}", kind.label());
    }
    if !controller.open_detail(&id) {
        bail!("{} records have no detail view", kind.label());
    }
    controller.settle().await;

    if let Some(notice) = controller
        .take_notices()
        .into_iter()
        .find(|notice| notice.kind == NoticeKind::DetailFailed)
    {
        bail!("{}", notice.message);
    }
    if let Some(record) = controller.detail() {
        println!("{}", render::detail(record, controller.config().detail_columns));
    }
    controller.close_detail();
    Ok(())
}

async fn add_property(
    remote: Arc<dyn RemoteService>,
    fields: Vec<(String, String)>,
    images: Vec<PathBuf>,
) -> Result<()> {
    let mut draft = PropertyDraft::new();
    for (name, value) in fields {
        draft.set(&name, value)?;
    }
    for path in images {
        draft.add_image(ImageAttachment::from_path(&path).await?);
    }

    match property_form::submit(remote.as_ref(), &mut draft).await {
        Ok(()) => {
            println!("Property saved successfully");
            Ok(())
        }
        Err(ConsoleError::Validation(errors)) => {
            for (field, message) in &errors {
                eprintln!("  {field}: {message}");
            }
            bail!("property form has {} missing field(s)", errors.len());
        }
        Err(err) => bail!("Failed to save property: {}", err.user_message()),
    }
}
