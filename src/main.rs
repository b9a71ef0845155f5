use anyhow::Context;
use property_finder::favorites::{FavoritesTracker, InMemoryFavoritesStore};
use property_finder::listings::{FallbackListingSource, ListingSource, ListingsApiClient, MockListingSource};
use property_finder::search::{FilterForm, SearchService};
use property_finder::{Config, Session, User};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Property Finder");
    info!("==================");

    let config = Config::load();

    // Optional JSON filter form as the first argument
    let form = match std::env::args().nth(1) {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read filter form {}", path))?;
            serde_json::from_str::<FilterForm>(&raw).context("Invalid filter form JSON")?
        }
        None => FilterForm::default(),
    };

    let source: Arc<dyn ListingSource> = match &config.api_key {
        Some(key) => Arc::new(FallbackListingSource::new(ListingsApiClient::new(
            config.api_url.clone(),
            key.clone(),
            config.http_timeout,
        )?)),
        None => Arc::new(MockListingSource::new()),
    };

    let session = match std::env::var("FAVORITES_USER") {
        Ok(id) if !id.trim().is_empty() => Session::signed_in(User {
            email: format!("{}@localhost", id.trim()),
            id: id.trim().to_string(),
        }),
        _ => Session::default(),
    };

    let tracker = FavoritesTracker::new(Arc::new(InMemoryFavoritesStore::new()));
    tracker.set_user(session.user_id());

    let service = SearchService::new(source, config.result_limit);
    let mut views = service.search(&form, &tracker.favorite_ids()).await?;

    if let Some(first) = views.first() {
        if session.user.is_some() {
            tracker.toggle(&first.property).await;
            info!("⭐ Favorited {}", first.property.address);
            let ids = tracker.favorite_ids();
            for view in views.iter_mut() {
                view.is_favorite = ids.contains(&view.property.id);
            }
        }
    }

    // Display results
    info!("✅ Found {} properties", views.len());

    for (i, view) in views.iter().enumerate() {
        let p = &view.property;
        let star = if view.is_favorite { " ★" } else { "" };
        println!("{}. {} (${:.0}){}", i + 1, p.address, p.price, star);
        println!("   {} bd, {} ba, {:.0} sqft, {}", p.bedrooms, p.bathrooms, p.size, p.property_type);
        println!("   {}, {}", p.city, p.state);
        println!("   ID: {}", p.id);
        if !p.amenities.is_empty() {
            println!("   Amenities: {}", p.amenities.join(", "));
        }
        println!();
    }

    let json = serde_json::to_string_pretty(&views)?;
    tokio::fs::write("search_results.json", json).await?;
    info!("💾 Saved results to search_results.json");

    Ok(())
}
