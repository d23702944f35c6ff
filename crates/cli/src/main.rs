// studiorate CLI - package pricing from the studio's addon sheet

mod context;
mod exit_codes;
mod logging;
mod render;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use studiorate_engine::{
    addon_availability, inspect_rows, match_event_type, min_base_by_tier, resolve_event_type, AddonAvailability,
    AddonKey, BuildReport, PackageTier, PricingMatrix, SheetInspection, TierPrices,
};
use studiorate_io::SourceFailure;
use tracing::{info, warn};

use context::{load_matrix, resolve_settings, SourceOverrides, Sources};
use exit_codes::{EXIT_OUTPUT, EXIT_SOURCE_UNAVAILABLE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "studiorate")]
#[command(about = "Studio package pricing from the addon sheet")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Settings file (default: <config dir>/studiorate/settings.toml)
    #[arg(long, global = true, env = "STUDIORATE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Live sheet id (overrides SHEETS_ID)
    #[arg(long, global = true, value_name = "ID")]
    sheets_id: Option<String>,

    /// Live sheet tab (overrides SHEETS_TAB)
    #[arg(long, global = true, value_name = "NAME")]
    tab: Option<String>,

    /// Local workbook or CSV (overrides ADDONS_XLS_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Skip the live sheet even when configured
    #[arg(long, global = true)]
    offline: bool,
}

impl From<SourceArgs> for SourceOverrides {
    fn from(a: SourceArgs) -> Self {
        Self { config: a.config, sheets_id: a.sheets_id, tab: a.tab, file: a.file, offline: a.offline }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pricing matrix as JSON
    #[command(after_help = "\
Examples:
  studiorate matrix
  studiorate matrix --debug --file public/data/addons.xlsx
  studiorate matrix --compact --offline")]
    Matrix {
        /// Include build diagnostics under \"_debug\"
        #[arg(long)]
        debug: bool,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Price a package configuration
    #[command(after_help = "\
Examples:
  studiorate quote -e Svadba -t classic
  studiorate quote -e svadba -t classic -a secondPhotog -a drone --extra-units 2
  studiorate quote -e studio -t basic -a album,usb --json")]
    Quote {
        /// Event type (matched against the sheet, e.g. \"portret\" finds \"Studio\")
        #[arg(long, short = 'e')]
        event: String,

        /// Package tier: basic, classic or signature
        #[arg(long, short = 't')]
        tier: String,

        /// Addon key to include (repeatable or comma-separated)
        #[arg(long = "addon", short = 'a', value_name = "KEY", value_delimiter = ',')]
        addons: Vec<String>,

        /// Extra hours beyond the package
        #[arg(long, default_value_t = 0)]
        extra_units: u32,

        #[arg(long)]
        json: bool,
    },

    /// List the addons offered for an event type and tier
    #[command(after_help = "\
Examples:
  studiorate addons -e Svadba -t signature
  studiorate addons -e krstenja -t basic --json")]
    Addons {
        #[arg(long, short = 'e')]
        event: String,

        #[arg(long, short = 't')]
        tier: String,

        #[arg(long)]
        json: bool,
    },

    /// List event types found in the sheet
    #[command(after_help = "\
Examples:
  studiorate events
  studiorate events --match rodjendani
  studiorate events --match koncert --fallback Svadba --json")]
    Events {
        /// Resolve a label to one of the event types
        #[arg(long = "match", value_name = "LABEL")]
        query: Option<String>,

        /// Event type to use when the label matches nothing
        #[arg(long, value_name = "EVENT", requires = "query")]
        fallback: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Lowest base price per tier across all event types
    Prices {
        #[arg(long)]
        json: bool,
    },

    /// Show how the sheet's columns and rows are read
    #[command(after_help = "\
Examples:
  studiorate inspect
  studiorate inspect --file addons.csv --json")]
    Inspect {
        #[arg(long)]
        json: bool,
    },

    /// Show the configured sources without loading them
    Sources {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let overrides = SourceOverrides::from(cli.source);
    let result = match cli.command {
        Commands::Matrix { debug, compact } => cmd_matrix(&overrides, debug, compact),
        Commands::Quote { event, tier, addons, extra_units, json } => {
            cmd_quote(&overrides, &event, &tier, &addons, extra_units, json)
        }
        Commands::Addons { event, tier, json } => cmd_addons(&overrides, &event, &tier, json),
        Commands::Events { query, fallback, json } => cmd_events(&overrides, query.as_deref(), fallback.as_deref(), json),
        Commands::Prices { json } => cmd_prices(&overrides, json),
        Commands::Inspect { json } => cmd_inspect(&overrides, json),
        Commands::Sources { json } => cmd_sources(&overrides, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

fn parse_tier(raw: &str) -> Result<PackageTier, CliError> {
    raw.parse::<PackageTier>()
        .map_err(|e| CliError::usage(e.to_string()).with_hint("tiers: basic, classic, signature"))
}

fn parse_addons(raw: &[String]) -> Result<Vec<AddonKey>, CliError> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<AddonKey>().map_err(|e| {
                let keys: Vec<&str> = AddonKey::DISPLAY_ORDER.iter().map(|k| k.key()).collect();
                CliError::usage(e.to_string()).with_hint(format!("addon keys: {}", keys.join(", ")))
            })
        })
        .collect()
}

/// Map a typed event label onto the sheet's own label.
///
/// Unmatched labels are kept as typed; pricing then uses the default base
/// and offers no addons beyond the privacy opt-in.
fn resolve_event(matrix: &PricingMatrix, raw: &str) -> Result<String, CliError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CliError::usage("event type must not be empty"));
    }
    match resolve_event_type(raw, matrix.event_types()) {
        Some(event) => {
            if event != raw {
                info!(requested = raw, resolved = %event, "event type resolved");
            }
            Ok(event)
        }
        None => {
            warn!(event = raw, "event type not in the pricing sheet; using default prices");
            Ok(raw.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildDiagnostics<'a> {
    source: Option<&'a str>,
    failures: &'a [SourceFailure],
    #[serde(flatten)]
    report: &'a BuildReport,
}

#[derive(Serialize)]
struct MatrixOutput<'a> {
    /// Source the matrix came from; null when every source failed.
    source: Option<&'a str>,
    #[serde(flatten)]
    matrix: &'a PricingMatrix,
    #[serde(rename = "_debug", skip_serializing_if = "Option::is_none")]
    debug: Option<BuildDiagnostics<'a>>,
}

fn cmd_matrix(overrides: &SourceOverrides, debug: bool, compact: bool) -> Result<(), CliError> {
    let loaded = load_matrix(overrides, debug)?;
    let output = MatrixOutput {
        source: loaded.outcome.source.as_deref(),
        matrix: &loaded.matrix,
        debug: debug.then(|| BuildDiagnostics {
            source: loaded.outcome.source.as_deref(),
            failures: &loaded.outcome.failures,
            report: &loaded.report,
        }),
    };
    render::emit_json(&output, compact)
}

fn cmd_quote(
    overrides: &SourceOverrides,
    event: &str,
    tier: &str,
    addons: &[String],
    extra_units: u32,
    json: bool,
) -> Result<(), CliError> {
    let tier = parse_tier(tier)?;
    let checked = parse_addons(addons)?;
    let loaded = load_matrix(overrides, false)?;
    let event = resolve_event(&loaded.matrix, event)?;

    let schedule = &loaded.settings.pricing;
    let quote = schedule.quote(&loaded.matrix, &event, tier, &checked, extra_units);
    if !quote.ignored.is_empty() {
        warn!(ignored = ?quote.ignored, "selected addons not offered for this package");
    }

    if json {
        render::emit_json(&quote, false)
    } else {
        render::emit_text(|out| render::quote(out, &quote, schedule.unit_rate))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddonsOutput<'a> {
    event_type: &'a str,
    tier: PackageTier,
    #[serde(flatten)]
    availability: &'a AddonAvailability,
    extras_included: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

fn cmd_addons(overrides: &SourceOverrides, event: &str, tier: &str, json: bool) -> Result<(), CliError> {
    let tier = parse_tier(tier)?;
    let loaded = load_matrix(overrides, false)?;
    let event = resolve_event(&loaded.matrix, event)?;
    let availability = addon_availability(&loaded.matrix, &event, tier);

    if json {
        let output = AddonsOutput {
            event_type: &event,
            tier,
            availability: &availability,
            extras_included: loaded.matrix.extras(&event, tier),
            note: loaded.matrix.note(&event, tier),
        };
        return render::emit_json(&output, false);
    }

    render::emit_text(|out| {
        render::availability(out, &event, tier, &availability)?;
        let extras = loaded.matrix.extras(&event, tier);
        if !extras.is_empty() {
            writeln!(out, "  also included: {}", extras.join(", "))?;
        }
        if let Some(note) = loaded.matrix.note(&event, tier) {
            writeln!(out, "  note: {note}")?;
        }
        Ok(())
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventsOutput<'a> {
    event_types: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<Option<String>>,
}

fn cmd_events(
    overrides: &SourceOverrides,
    query: Option<&str>,
    fallback: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let loaded = load_matrix(overrides, false)?;
    let events = loaded.matrix.event_types();
    let matched = query.map(|q| match_event_type(Some(q), events, fallback.unwrap_or_default()));

    if json {
        return render::emit_json(&EventsOutput { event_types: events, query, matched }, false);
    }

    render::emit_text(|out| {
        match (query, &matched) {
            (Some(q), Some(Some(event))) => writeln!(out, "{q} -> {event}")?,
            (Some(q), _) => writeln!(out, "{q} -> (no event types)")?,
            (None, _) => {
                for event in events {
                    writeln!(out, "{event}")?;
                }
            }
        }
        Ok(())
    })
}

#[derive(Serialize)]
struct PricesOutput<'a> {
    source: Option<&'a str>,
    prices: TierPrices,
}

fn cmd_prices(overrides: &SourceOverrides, json: bool) -> Result<(), CliError> {
    let loaded = load_matrix(overrides, false)?;
    let prices = min_base_by_tier(&loaded.matrix, &loaded.settings.pricing);

    if json {
        render::emit_json(&PricesOutput { source: loaded.outcome.source.as_deref(), prices }, false)
    } else {
        render::emit_text(|out| render::prices(out, &prices))
    }
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    source: &'a str,
    #[serde(flatten)]
    inspection: &'a SheetInspection,
}

fn cmd_inspect(overrides: &SourceOverrides, json: bool) -> Result<(), CliError> {
    let settings = resolve_settings(overrides)?;
    let outcome = Sources::from_settings(&settings).load();
    let Some(source) = outcome.source.as_deref() else {
        let tried: Vec<String> = outcome.failures.iter().map(|f| format!("{}: {}", f.source, f.error)).collect();
        return Err(CliError {
            code: EXIT_SOURCE_UNAVAILABLE,
            message: "no sheet source could be loaded".to_string(),
            hint: Some(tried.join("; ")),
        });
    };
    let inspection = inspect_rows(&outcome.rows);

    if json {
        render::emit_json(&InspectOutput { source, inspection: &inspection }, false)
    } else {
        render::emit_text(|out| render::inspection(out, source, &inspection))
    }
}

fn cmd_sources(overrides: &SourceOverrides, json: bool) -> Result<(), CliError> {
    let settings = resolve_settings(overrides)?;
    let report = Sources::from_settings(&settings).report();

    if json {
        render::emit_json(&report, false)
    } else {
        render::emit_text(|out| render::sources(out, &report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addons_accept_mixed_case_and_skip_blanks() {
        let raw = vec!["SecondPhotog".to_string(), " ".to_string(), "drone".to_string()];
        assert_eq!(parse_addons(&raw).unwrap(), vec![AddonKey::SecondPhotog, AddonKey::Drone]);
    }

    #[test]
    fn unknown_addon_is_a_usage_error() {
        let err = parse_addons(&["helicopter".to_string()]).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.hint.unwrap().contains("secondPhotog"));
    }

    #[test]
    fn unknown_tier_is_a_usage_error() {
        assert_eq!(parse_tier(" Classic ").unwrap(), PackageTier::Classic);
        assert_eq!(parse_tier("gold").unwrap_err().code, EXIT_USAGE);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
