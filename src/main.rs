// SPDX-License-Identifier: MPL-2.0
use iced_gallery::app::{self, paths, Flags};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,iced_gallery=debug";

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> iced::Result {
    init_logging();

    let mut args = pico_args::Arguments::from_env();
    let lang = args.opt_value_from_str("--lang").unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring --lang");
        None
    });
    let data_dir = args.opt_value_from_str("--data-dir").unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring --data-dir");
        None
    });
    let config_dir = args.opt_value_from_str("--config-dir").unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring --config-dir");
        None
    });
    let api_url = args.opt_value_from_str("--api-url").unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring --api-url");
        None
    });

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "unused arguments");
    }

    paths::init_cli_overrides(data_dir, config_dir);
    app::run(Flags { lang, api_url })
}
