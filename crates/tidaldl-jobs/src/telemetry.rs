//! Tracing subscriber bootstrap for hosts embedding the session.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a compact stdout subscriber.
///
/// `RUST_LOG` wins over `default_filter` (e.g. `"tidaldl=info"`). Fails if
/// a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter '{default_filter}'"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .compact(),
        )
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error() {
        // Another test in the process may have won the race; either way the
        // second call must fail instead of panicking.
        let _ = init_tracing("tidaldl=debug");
        assert!(init_tracing("tidaldl=debug").is_err());
    }
}
