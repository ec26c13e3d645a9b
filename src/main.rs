use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use card_gallery::application::{GalleryQuery, SearchGalleryUseCase};
use card_gallery::infrastructure::image::Subscription;
use card_gallery::infrastructure::{
    AppConfig, CliArgs, DiskImageCache, HttpImageFetcher, ImageLoader, OutcomeBroadcaster,
    ScryfallClient, StorageManager, WorkerPool,
};
use card_gallery::presentation::{DetailScreen, GalleryScreen};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_loader(config: &AppConfig) -> Result<ImageLoader> {
    let pool = WorkerPool::new(config.cache.max_workers);
    let store = Arc::new(DiskImageCache::new(config.cache.effective_dir()));
    let fetcher = Arc::new(HttpImageFetcher::new(Duration::from_secs(
        config.cache.timeout_secs,
    ))?);

    info!(
        cache_dir = %store.cache_dir().display(),
        workers = pool.max_workers(),
        "Image loader ready"
    );

    Ok(ImageLoader::new(store, fetcher, pool, OutcomeBroadcaster::new()))
}

async fn run_gallery(gallery: &mut GalleryScreen, subscription: &mut Subscription) {
    while !gallery.is_complete() {
        let Some(outcome) = subscription.receiver.recv().await else {
            warn!("Outcome channel closed before the gallery completed");
            break;
        };
        if gallery.apply(&outcome) {
            let (settled, total) = gallery.progress();
            info!(url = outcome.url(), settled, total, "Thumbnail settled");
        }
    }
}

async fn run_detail(detail: &mut DetailScreen, subscription: &mut Subscription) {
    while !detail.is_settled() {
        let Some(outcome) = subscription.receiver.recv().await else {
            break;
        };
        detail.apply(&outcome);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = card_gallery::VERSION, "Starting card gallery");

    let search = Arc::new(ScryfallClient::with_base_url(&config.search.base_url)?);
    let use_case = SearchGalleryUseCase::new(search);
    let query = GalleryQuery::new(args.query.clone().unwrap_or_default(), args.page)
        .with_collection(args.only.clone());
    let page = use_case.execute(&query).await?;

    let loader = create_loader(&config)?;

    let mut gallery = GalleryScreen::new(&page, config.gallery.thumb_size());
    let mut gallery_subscription = loader.subscribe();

    let mut detail = args
        .detail
        .and_then(|index| page.cards.get(index))
        .map(DetailScreen::new);
    let mut detail_subscription = detail.as_ref().map(|_| loader.subscribe());

    loader.request_batch(gallery.image_requests());
    if let Some(request) = detail.as_ref().and_then(DetailScreen::image_request) {
        loader.request(request);
    }

    run_gallery(&mut gallery, &mut gallery_subscription).await;
    loader.broadcaster().unsubscribe(gallery_subscription.id);

    for line in gallery.render_lines() {
        println!("{line}");
    }

    if let (Some(detail), Some(subscription)) = (detail.as_mut(), detail_subscription.as_mut()) {
        run_detail(detail, subscription).await;
        println!();
        for line in detail.render_lines() {
            println!("{line}");
        }
    }

    info!(
        ready = gallery.ready_count(),
        failed = gallery.failed_count(),
        "Gallery complete"
    );

    Ok(())
}
