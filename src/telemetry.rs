use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global tracing subscriber. `RUST_LOG` wins over
/// `default_filter`, e.g. `RUST_LOG=debug,uno::events=info`.
pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
