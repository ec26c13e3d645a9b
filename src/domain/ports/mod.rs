mod blob_store_port;
mod image_fetcher_port;
mod search_port;

pub use blob_store_port::BlobStore;
#[cfg(test)]
pub use image_fetcher_port::MockImageFetcher;
pub use image_fetcher_port::ImageFetcher;
pub use search_port::SearchPort;

#[cfg(test)]
pub mod mocks {
    pub use super::blob_store_port::mock::MemoryBlobStore;
    pub use super::image_fetcher_port::mock::CountingFetcher;
    pub use super::search_port::mock::{StaticSearch, card};
}
