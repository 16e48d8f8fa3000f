use importer::models::CreateFeed;
use importer::services::SchedulerJob;
use importer::{Config, Environment};
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const USAGE: &str = "usage: newsreel [add <url> <collection> | list | remove <id> | sync | preview <url>]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let environment = Environment::from_str(&env::var("NEWSREEL_ENV").unwrap_or_default());
    let data_path = env::var("DATA_PATH")
        .map(Into::into)
        .unwrap_or_else(|_| environment.default_data_path());

    let mut config = Config::new(environment, data_path);
    if let Ok(interval) = env::var("POLL_INTERVAL_SECS") {
        config.poll_interval_secs = interval.parse()?;
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        // No command: run the polling daemon
        None => return importer::run(config).await,
        Some("add") => {
            let [_, url, collection] = &args[..] else {
                return Err(USAGE.into());
            };
            let state = importer::open(config).await?;
            let feed = state
                .feeds
                .create(CreateFeed {
                    url: url.clone(),
                    collection: collection.clone(),
                    enabled: true,
                })
                .await?;
            println!("Added feed {} ({} -> {})", feed.id, feed.url, feed.collection);
        }
        Some("list") => {
            let state = importer::open(config).await?;
            for feed in state.feeds.list().await? {
                println!(
                    "{:>4}  [{}]  {}  {}",
                    feed.id,
                    if feed.enabled { "on " } else { "off" },
                    feed.url,
                    feed.collection
                );
            }
        }
        Some("remove") => {
            let [_, id] = &args[..] else {
                return Err(USAGE.into());
            };
            let id: i64 = id.parse()?;
            let state = importer::open(config).await?;
            state.feeds.delete(id, false).await?;
            println!("Removed feed {}", id);
        }
        // One-shot import pass over all enabled subscriptions
        Some("sync") => {
            let state = importer::open(config).await?;
            state
                .feed_sync_job
                .execute()
                .await
                .map_err(|e| e as Box<dyn std::error::Error>)?;
        }
        Some("preview") => {
            let [_, url] = &args[..] else {
                return Err(USAGE.into());
            };
            let state = importer::open(config).await?;
            for entry in state.feeds.preview(url).await? {
                let published = entry
                    .published_at
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {}", published, entry.title);
            }
        }
        Some(_) => return Err(USAGE.into()),
    }

    Ok(())
}
