use clap::Parser;
use openhousepal::engine::{SortKey, SortOrder, Tab};
use openhousepal::{ClientConfig, HttpShowcaseApi, ShowcasePage};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Browse and react to the properties in an OpenHousePal showcase
#[derive(Debug, Parser)]
#[command(name = "openhousepal", version)]
struct Cli {
    /// Collection (showcase) id to open
    #[arg(long)]
    collection: String,

    /// all, liked or disliked
    #[arg(long, default_value = "all")]
    tab: Tab,

    /// price, beds or square-feet
    #[arg(long, default_value = "price")]
    sort: SortKey,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    order: SortOrder,

    /// Backend base URL (overrides OPENHOUSEPAL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Property id to like
    #[arg(long)]
    like: Option<String>,

    /// Property id to dislike
    #[arg(long)]
    dislike: Option<String>,

    /// Property id to favorite
    #[arg(long)]
    favorite: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_base_url(url);
    }
    if config.token.is_none() {
        warn!("No token configured; set OPENHOUSEPAL_TOKEN or OPENHOUSEPAL_COOKIE");
    }

    info!("🏠 OpenHousePal - showcase {}", cli.collection);

    let api = HttpShowcaseApi::new(&config)?;
    api.session()
        .set_current_path(format!("/showcases?collection={}", cli.collection));
    let page = ShowcasePage::new(Arc::new(api), &config);

    let loaded = page.select_collection(&cli.collection).await?;
    info!("Loaded {} properties", loaded);

    if let Some(id) = cli.like.as_deref() {
        page.set_like(id, true).await?;
    }
    if let Some(id) = cli.dislike.as_deref() {
        page.set_dislike(id, true).await?;
    }
    if let Some(id) = cli.favorite.as_deref() {
        page.set_favorite(id, true).await?;
    }

    page.set_tab(cli.tab);
    page.set_sort(cli.sort, cli.order);

    let counts = page.tab_counts();
    println!(
        "All: {}  Liked: {}  Disliked: {}\n",
        counts.all, counts.liked, counts.disliked
    );

    for (i, property) in page.visible_properties().iter().enumerate() {
        let mut marks = Vec::new();
        if property.liked {
            marks.push("liked");
        }
        if property.favorited {
            marks.push("favorite");
        }
        println!("{}. {}", i + 1, property.full_address());
        println!(
            "   ${}  {} bd  {} ba  {} sqft",
            property.price.unwrap_or(0),
            property.beds.unwrap_or(0),
            property.baths.unwrap_or(0.0),
            property.square_feet.unwrap_or(0)
        );
        println!("   ID: {}", property.id);
        if !marks.is_empty() {
            println!("   {}", marks.join(", "));
        }
        println!();
    }

    if let Some(toast) = page.notifications().current() {
        println!("[{:?}] {}", toast.kind, toast.message);
    }

    Ok(())
}
