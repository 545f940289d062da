//! Serve command - run the HTTP server

use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::error::FolioResult;
use crate::server;
use tracing::debug;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: &Config) -> FolioResult<()> {
    let config = apply_overrides(args, config);
    debug!("Effective configuration: {:?}", config);
    server::serve(&config).await
}

/// Layer command-line flags over the loaded configuration
fn apply_overrides(args: ServeArgs, config: &Config) -> Config {
    let mut config = config.clone();

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(data_dir) = args.data_dir {
        config.store.data_dir = data_dir;
    }
    if let Some(static_dir) = args.static_dir {
        config.server.static_dir = Some(static_dir);
    }

    config
}
