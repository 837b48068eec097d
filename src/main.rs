use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures::channel::mpsc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use helpdesk_inbox::api::HttpInboxApi;
use helpdesk_inbox::config::{APP_ID, VERSION};
use helpdesk_inbox::models::{ListContext, ListType, PushEvent};
use helpdesk_inbox::services::{InboxStore, ListSnapshot, Notification, SettingsService};

const USAGE: &str = concat!(
    "usage: helpdesk-inbox ",
    "<assigned|unassigned|all|mentioned|team_unassigned|view> ",
    "[team or view id] [--watch]"
);

#[derive(Debug, PartialEq)]
struct Args {
    context: ListContext,
    watch: bool,
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut watch = false;
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--watch" | "-w" => watch = true,
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(list_type) = positional.next() else {
        bail!(USAGE);
    };
    let list_type = ListType::from_str(&list_type)
        .with_context(|| format!("Unknown list type '{}'\n{}", list_type, USAGE))?;

    let id = positional
        .next()
        .map(|id| id.parse::<i64>().with_context(|| format!("'{}' is not a numeric id", id)))
        .transpose()?;

    let context = match (list_type, id) {
        (ListType::TeamUnassigned, Some(id)) => ListContext::team(id),
        (ListType::View, Some(id)) => ListContext::view(id),
        (ListType::TeamUnassigned | ListType::View, None) => {
            bail!("'{}' needs an id\n{}", list_type.as_str(), USAGE)
        }
        (list_type, _) => ListContext::new(list_type),
    };
    Ok(Args { context, watch })
}

fn render(snapshot: &ListSnapshot) -> String {
    let mut lines = vec![format!(
        "{} {} conversations, {} shown, {}",
        snapshot.total,
        if snapshot.status.is_empty() { "total" } else { snapshot.status.as_str() },
        snapshot.rows.len(),
        snapshot.sort_field.label().to_lowercase()
    )];
    for row in &snapshot.rows {
        let unread = if row.unread_message_count > 0 {
            format!("({})", row.unread_message_count)
        } else {
            String::new()
        };
        lines.push(format!(
            "{:>5} {:<10} {:<24} {}",
            unread,
            row.reference_number,
            row.contact_name(),
            row.last_message.as_deref().unwrap_or("")
        ));
    }
    if snapshot.has_more {
        lines.push("  ...".to_string());
    }
    if let Some(error) = &snapshot.error_message {
        lines.push(format!("error: {}", error));
    }
    lines.join("\n")
}

async fn read_events(tx: mpsc::UnboundedSender<PushEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<PushEvent>(line) {
            Ok(event) => {
                if tx.unbounded_send(event).is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!("Skipping malformed event: {}", e),
        }
    }
    Ok(())
}

async fn watch(store: InboxStore) -> Result<()> {
    let (tx, rx) = mpsc::unbounded();
    let reader = tokio::spawn(read_events(tx));
    let mut events = {
        let store = store.clone();
        tokio::spawn(async move {
            store.run_events(rx).await;
            store.settle().await;
        })
    };

    let mut notifications = store.notifier().subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut shown = render(&store.list_snapshot());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let current = render(&store.list_snapshot());
                if current != shown {
                    println!("\n{}", current);
                    shown = current;
                }
            }
            Ok(notification) = notifications.recv() => {
                if let Notification::Toast { description, .. } = notification {
                    eprintln!("! {}", description);
                }
            }
            result = &mut events => {
                result.context("Event loop panicked")?;
                break;
            }
        }
    }
    reader.await.context("Event reader panicked")??;

    let current = render(&store.list_snapshot());
    if current != shown {
        println!("\n{}", current);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    tracing::info!("{} {} starting", APP_ID, VERSION);

    let settings = SettingsService::load().context("Failed to load settings")?;
    if settings.credentials().is_none() {
        tracing::warn!("No API key configured; requests are sent unauthenticated");
    }
    let api = HttpInboxApi::new(&settings.base_url, settings.credentials(), settings.timeout())?;
    let store = InboxStore::new(Arc::new(api));

    store
        .fetch_conversations_list(args.context, Vec::new(), Some(1))
        .await;
    println!("{}", render(&store.list_snapshot()));

    if args.watch {
        watch(store).await?;
    }
    Ok(())
}
