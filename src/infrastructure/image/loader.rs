//! Async image loading orchestrator.
//!
//! Disk cache first, then network. A miss is fetched, transcoded, stored and
//! scaled; a hit is decoded and scaled. Every request yields exactly one
//! [`DeliveryOutcome`], published through the [`OutcomeBroadcaster`].

use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, error, trace, warn};

use crate::domain::entities::{
    CacheKey, DeliveryOutcome, ImageRequest, ImageSource, ScaledImage, TargetSize,
};
use crate::domain::errors::{ImageError, ImageResult};
use crate::domain::ports::{BlobStore, ImageFetcher};

use super::delivery::{OutcomeBroadcaster, Subscription};
use super::in_flight::InFlightRegistry;
use super::transcoder::Transcoder;
use super::worker_pool::WorkerPool;

/// Coordinates fetch, transcode, store and scale for image requests.
/// Cheap to clone; clones share the pool, the store and the subscribers.
#[derive(Clone)]
pub struct ImageLoader {
    handle: Arc<ImageLoaderHandle>,
    pool: WorkerPool,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("pool", &self.pool)
            .field("in_flight", &self.handle.in_flight)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader over the given store and fetcher. Jobs submitted with
    /// [`ImageLoader::request`] run on `pool`; outcomes go to `broadcaster`.
    #[must_use]
    pub fn new(
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn ImageFetcher>,
        pool: WorkerPool,
        broadcaster: OutcomeBroadcaster,
    ) -> Self {
        Self {
            handle: Arc::new(ImageLoaderHandle {
                store,
                fetcher,
                transcoder: Transcoder::new(),
                in_flight: InFlightRegistry::new(),
                broadcaster,
            }),
            pool,
        }
    }

    /// Subscribes to every outcome this loader publishes.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.handle.broadcaster.subscribe()
    }

    /// Returns the broadcaster outcomes are published on.
    #[must_use]
    pub fn broadcaster(&self) -> &OutcomeBroadcaster {
        &self.handle.broadcaster
    }

    /// Starts loading an image on the worker pool.
    /// The result will be sent via the broadcaster, including when the
    /// pipeline panics.
    pub fn request(&self, request: ImageRequest) {
        trace!(url = %request.url, size = %request.target_size, "Queued image request");
        let handle = self.handle.clone();
        self.pool.submit(async move {
            let url = request.url.clone();
            let target_size = request.target_size;
            let pipeline = handle.clone();

            let outcome =
                match tokio::spawn(async move { pipeline.load(&request).await }).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(url = %url, error = %e, "Image pipeline panicked");
                        DeliveryOutcome::Failed {
                            url,
                            target_size,
                            error: format!("image pipeline panicked: {e}"),
                        }
                    }
                };
            handle.broadcaster.publish(&outcome);
        });
    }

    /// Queues every request in `requests`.
    pub fn request_batch(&self, requests: impl IntoIterator<Item = ImageRequest>) {
        for request in requests {
            self.request(request);
        }
    }

    /// Runs the pipeline for `request` on the current task and returns its
    /// outcome without publishing it.
    pub async fn load(&self, request: &ImageRequest) -> DeliveryOutcome {
        self.handle.load(request).await
    }

    /// Number of keys with a pipeline currently running.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.handle.in_flight.in_flight()
    }
}

/// Internal handle shared with pool jobs.
struct ImageLoaderHandle {
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn ImageFetcher>,
    transcoder: Transcoder,
    in_flight: InFlightRegistry,
    broadcaster: OutcomeBroadcaster,
}

impl ImageLoaderHandle {
    async fn load(&self, request: &ImageRequest) -> DeliveryOutcome {
        let key = request.cache_key();
        let _flight = self.in_flight.acquire(&key).await;

        match self.resolve(&key, request).await {
            Ok(image) => {
                debug!(
                    url = %request.url,
                    key = %key,
                    source = %image.source,
                    width = image.width(),
                    height = image.height(),
                    "Image loaded"
                );
                DeliveryOutcome::Loaded {
                    url: request.url.clone(),
                    target_size: request.target_size,
                    image,
                }
            }
            Err(e) => {
                warn!(url = %request.url, key = %key, error = %e, "Failed to load image");
                DeliveryOutcome::Failed {
                    url: request.url.clone(),
                    target_size: request.target_size,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn resolve(&self, key: &CacheKey, request: &ImageRequest) -> ImageResult<ScaledImage> {
        if let Some(cached) = self.load_cached(key).await {
            let image = self.scale(cached, request.target_size).await?;
            return Ok(ScaledImage {
                image,
                source: ImageSource::DiskCache,
            });
        }

        let raw = self.fetcher.fetch(&request.url).await?;

        let transcoder = self.transcoder;
        let (encoded, decoded) =
            tokio::task::spawn_blocking(move || transcoder.encode_for_storage(&raw))
                .await
                .map_err(|e| ImageError::decode(format!("decode task panicked: {e}")))??;

        // Availability over durability: a failed write still delivers.
        if let Err(e) = self.store.write(key, &encoded).await {
            warn!(key = %key, error = %e, "Failed to cache to disk");
        }

        let image = self.scale(decoded, request.target_size).await?;
        Ok(ScaledImage {
            image,
            source: ImageSource::Network,
        })
    }

    /// Returns the decoded cached blob, or `None` to fall through to a fetch.
    /// Unreadable or corrupt blobs are treated as misses so the refetch
    /// overwrites them.
    async fn load_cached(&self, key: &CacheKey) -> Option<DynamicImage> {
        if !self.store.exists(key).await {
            trace!(key = %key, "Cache miss");
            return None;
        }

        let bytes = match self.store.read(key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "Cached blob unreadable, refetching");
                return None;
            }
        };

        let transcoder = self.transcoder;
        match tokio::task::spawn_blocking(move || transcoder.decode(&bytes)).await {
            Ok(Ok(image)) => {
                trace!(key = %key, "Decoded image from disk cache");
                Some(image)
            }
            Ok(Err(e)) => {
                warn!(key = %key, error = %e, "Cached blob corrupt, refetching");
                None
            }
            Err(e) => {
                error!(key = %key, error = %e, "Decode task panicked");
                None
            }
        }
    }

    async fn scale(
        &self,
        image: DynamicImage,
        target: TargetSize,
    ) -> ImageResult<Arc<DynamicImage>> {
        let transcoder = self.transcoder;
        tokio::task::spawn_blocking(move || transcoder.scale(&image, target))
            .await
            .map_err(|e| ImageError::decode(format!("scale task panicked: {e}")))
    }
}
