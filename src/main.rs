mod config;
mod core;
mod location;
mod models;
mod services;
mod session;

use chrono::Utc;
use config::Settings;
use location::{FixedLocationProvider, LocationTracker};
use models::GeoPoint;
use services::{Catalog, ChatService, MatchingService, RandomDecider, RestaurantService, TokioSleeper};
use session::{MatchSession, MatchStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// One-shot demo flow: acquire a (simulated) location, rank the bundled
/// restaurant catalog around it, open a match session on the nearest
/// restaurant, and issue a request to the top candidate.
#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting FoodMate demo flow...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let catalog = Arc::new(Catalog::from_data_dir(&settings.data.dir));
    let sleeper = Arc::new(TokioSleeper);

    let restaurants = RestaurantService::new(
        catalog.clone(),
        sleeper.clone(),
        Duration::from_millis(settings.simulation.restaurant_latency_ms),
    );

    let matching = MatchingService::new(
        catalog.clone(),
        sleeper.clone(),
        Arc::new(RandomDecider::new(settings.simulation.accept_rate)),
        Duration::from_millis(settings.simulation.search_latency_ms),
        Duration::from_millis(settings.simulation.request_latency_ms),
        settings.matching.radius_m,
        settings.matching.limit,
    );

    let chat = ChatService::new(
        sleeper.clone(),
        Duration::from_millis(settings.simulation.chat_send_latency_ms),
        Duration::from_millis(settings.simulation.chat_load_latency_ms),
    );

    // Simulated device: always authorized at the configured coordinate
    let provider = Arc::new(FixedLocationProvider::new(GeoPoint::new(
        settings.location.latitude,
        settings.location.longitude,
    )));
    let mut tracker = LocationTracker::new(provider);

    tracker.request_permission().await;
    let here = match tracker.current_location() {
        Some(point) => point,
        None => {
            error!(
                "no location available: {}",
                tracker
                    .last_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
            return Ok(());
        }
    };

    info!("Current location: ({}, {})", here.latitude, here.longitude);

    let nearby = match restaurants.fetch_nearby(here).await {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to fetch restaurants: {}", e);
            return Ok(());
        }
    };

    for restaurant in &nearby {
        info!(
            "{} {} ({}) - {}",
            restaurant.cuisine.icon(),
            restaurant.name,
            restaurant.price_level,
            restaurant.address
        );
    }

    let Some(nearest) = nearby.into_iter().next() else {
        warn!("Restaurant catalog is empty, nothing to match against");
        return Ok(());
    };

    info!("Opening match session at {}", nearest.name);
    let mut session = MatchSession::new(nearest, Utc::now());

    match session.discover(&matching).await {
        Ok(candidates) if candidates.is_empty() => {
            warn!("No candidates near the restaurant right now");
            return Ok(());
        }
        Ok(candidates) => {
            for user in candidates {
                info!("Candidate: {} ({:?})", user.nickname, user.gender);
            }
        }
        Err(e) => {
            error!("Candidate discovery failed: {}", e);
            return Ok(());
        }
    }

    let top = session.candidates()[0].clone();
    session.send_request(&matching, top).await;

    match session.status() {
        MatchStatus::Accepted => {
            let partner = session.selected().expect("accepted request has a selection");
            info!("{} accepted! Saying hello...", partner.nickname);
            let message = chat
                .send_message("demo-user", &partner.id, "Hey, lunch is on!")
                .await;
            info!("Sent message {} at {}", message.id, message.timestamp);
        }
        MatchStatus::Rejected => info!("Request rejected, better luck next time"),
        MatchStatus::Failed(reason) => warn!("Request failed: {}", reason),
        other => warn!("Unexpected session state: {:?}", other),
    }

    Ok(())
}
