//! Log output for the `idforge` binary.
//!
//! Generated IDs go to stdout, so every log line is written to stderr. The
//! filter defaults to `warn` and is overridden with `RUST_LOG`, e.g.
//!
//! ```bash
//! RUST_LOG=idforge=trace idforge ulid --monotonic --count 3
//! ```
//!
//! `warn` shows clock rollback and ULID exhaustion events; `trace` adds the
//! per-call spans of every generator.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
