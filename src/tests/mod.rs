//! Crate-level tests
//!
//! - Canonical manifest fixtures
//! - Master playlists built through the public mutators
//! - Parse/serialize round trips
//! - Structural validation of serialized output

pub mod round_trip;

/// Route `tracing` output to the test harness. `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hls_m3u8=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
