use std::sync::LazyLock;

use anyhow::Context;

/// The OANDA API token, only needed for live price polling.
pub fn oanda_auth_token() -> anyhow::Result<String> {
    static TOKEN: LazyLock<Option<String>> = LazyLock::new(|| std::env::var("OANDA_AUTH").ok());

    TOKEN
        .clone()
        .context("Environment variable OANDA_AUTH must be set.")
}
