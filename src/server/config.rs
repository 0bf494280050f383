//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration, from flags or the environment.
#[derive(Debug, Parser)]
#[command(name = "couponly", about = "Restaurant offers and single-use coupon codes")]
pub struct Cli {
    /// Address the HTTP server binds to.
    #[arg(long, env = "COUPON_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Path to the SQLite database file; created on first boot.
    #[arg(long, env = "COUPON_DATABASE_URL", default_value = "coupons.db")]
    pub database_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_without_arguments() {
        let cli = Cli::parse_from(["couponly"]);
        assert_eq!(cli.bind_addr.port(), 8080);
        assert_eq!(cli.database_url, "coupons.db");
    }

    #[rstest]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "couponly",
            "--bind-addr",
            "127.0.0.1:9000",
            "--database-url",
            "/tmp/test.db",
        ]);
        assert_eq!(cli.bind_addr.port(), 9000);
        assert_eq!(cli.database_url, "/tmp/test.db");
    }
}
