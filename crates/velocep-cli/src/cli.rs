//! CLI argument definitions for velocep.
//!
//! A single-purpose binary: resolve one postal code per invocation by
//! racing the configured providers.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--source` | `auto` | Providers entered into the race |
//! | `--deadline-ms` | `1000` | Global race deadline |
//! | `--request-timeout-ms` | `1000` | Per-provider request timeout |
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Race both providers for a postal code
//! velocep 01001000
//!
//! # Machine-readable output with a tighter deadline
//! velocep 01001-000 --format json --deadline-ms 500
//!
//! # Query a single provider (degenerate one-entrant race)
//! velocep 01001000 --source viacep
//! ```

use clap::{Parser, ValueEnum};

use velocep_core::DEFAULT_DEADLINE_MS;

/// Resolve a Brazilian postal code by racing BrasilAPI and ViaCEP.
///
/// The first provider to answer with a valid normalized address wins;
/// the race is bounded by a global deadline.
#[derive(Debug, Parser)]
#[command(
    name = "velocep",
    author,
    version,
    about = "Race BrasilAPI and ViaCEP to resolve a postal code"
)]
pub struct Cli {
    /// Postal code to resolve (8-digit CEP; a hyphen is passed through).
    ///
    /// No format validation is applied locally; malformed codes are
    /// forwarded to the upstream services, which reject them themselves.
    pub cep: String,

    /// Providers entered into the race.
    #[arg(long, value_enum, default_value_t = SourceSelector::Auto)]
    pub source: SourceSelector,

    /// Global race deadline in milliseconds, measured from race start.
    #[arg(long, default_value_t = DEFAULT_DEADLINE_MS)]
    pub deadline_ms: u64,

    /// Per-provider request timeout in milliseconds, independent of the
    /// global deadline.
    #[arg(long, default_value_t = 1_000)]
    pub request_timeout_ms: u64,

    /// Output format for results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Provider selection for the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Race every known provider (the default).
    Auto,
    /// Query BrasilAPI only.
    Brasilapi,
    /// Query ViaCEP only.
    Viacep,
}
