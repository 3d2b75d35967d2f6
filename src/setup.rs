use env_logger::{Builder, Env};
use log::{LevelFilter, SetLoggerError};

pub use log::{debug, info, warn};

/// Info unless the variable read by `env` says otherwise
fn builder(env: Env) -> Builder {
    Builder::from_env(env.default_filter_or("info"))
}

pub fn init() {
    // Init the logger, `RUST_LOG` takes precedence over the Info default
    builder(Env::default()).init();
}

/// Init the logger at a given level, tolerating an already installed logger (useful in tests)
pub fn try_init_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    Builder::from_default_env()
        .filter(Some("replicant"), level)
        .is_test(cfg!(test))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        let logger = builder(Env::new().filter("REPLICANT_UNSET_LOG")).build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }

    #[test]
    fn test_level_from_env() {
        std::env::set_var("REPLICANT_DEBUG_LOG", "debug");
        let logger = builder(Env::new().filter("REPLICANT_DEBUG_LOG")).build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }
}
