use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Filtering follows `RUST_LOG`, falling back to `default_level`.
///
/// Calling this twice is an error, the second subscriber is rejected.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(())
}
