#![allow(dead_code)]

pub mod mock_blob_store;
pub mod mock_site;

pub use mock_blob_store::MockBlobStore;
pub use mock_site::{MockFetcher, MockRenderer, SiteFixture};

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
