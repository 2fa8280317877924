//! Global tracing subscriber setup

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a stderr subscriber at DEBUG (`debug`) or INFO level.
///
/// `RUST_LOG` overrides the level when set.
pub fn init(debug: bool) -> Result<(), SetGlobalDefaultError> {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_only_once() {
        let _ = init(true);
        assert!(init(false).is_err());
    }
}
