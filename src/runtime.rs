//! Process-wide runtime setup and configuration printing.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::tuning;

static INIT: Once = Once::new();

/// Install the tracing subscriber. Idempotent; safe to call from every
/// binary entry point. Filter with `RUST_LOG` (defaults to `info`).
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

/// Print the runtime configuration: crate version, thread pool size, and
/// any tuning overrides in effect. `verbose` adds the per-variable tuner
/// state.
pub fn print_configuration(verbose: bool) {
    println!("octotune {}", env!("CARGO_PKG_VERSION"));
    println!("  rayon threads: {}", rayon::current_num_threads());
    for (key, value) in std::env::vars() {
        if key.starts_with("OCTOTUNE_OVERRIDE_") {
            println!("  override: {key}={value}");
        }
    }
    if verbose {
        for var in tuning::global().snapshot() {
            println!(
                "  tuning var {}: candidates={} samples={} converged={} best={:?}",
                var.name, var.candidates, var.samples, var.converged, var.best
            );
        }
    }
}
