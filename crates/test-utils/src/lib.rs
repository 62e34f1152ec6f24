//! Shared helpers for the `litdag` integration tests.

pub mod builders;
pub mod fake_executor;

pub use builders::{ConfigFileBuilder, TaskConfigBuilder};
pub use fake_executor::FakeExecutor;

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Upper bound for any single async test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test subscriber, once per test binary.
///
/// Output goes through the test writer, so it only shows for failing tests.
/// Raise the level with `LITDAG_LOG=debug`.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_env("LITDAG_LOG")
            .unwrap_or_else(|_| EnvFilter::new("litdag=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<T>(fut: impl Future<Output = T>) -> T {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(value) => value,
        Err(_) => panic!("test timed out after {TEST_TIMEOUT:?}"),
    }
}
