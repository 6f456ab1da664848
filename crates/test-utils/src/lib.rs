// crates/test-utils/src/lib.rs

//! Helpers shared by the brewkit integration tests.

pub mod fake_brew;
pub mod recording_observer;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

pub use fake_brew::FakeBrew;
pub use recording_observer::RecordingObserver;

static INIT: Once = Once::new();

/// Install a tracing subscriber whose output the test harness captures.
///
/// Defaults to `brewkit=debug` so operation lifecycle logs show up next to
/// a failing assertion; `RUST_LOG` overrides it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,brewkit=debug"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await `f`, panicking if it takes longer than ten seconds.
///
/// Every wait on a child process in the tests goes through this, so a hung
/// `brew` stand-in fails the test instead of stalling the run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("timed out after 10 seconds")
}
