//! Command-line entry point.
//!
//! The binary renders the dashboard's building blocks from local files so
//! they can be inspected without a backend:
//!
//! - `table`: a page of records through a field mapping
//! - `calendar`: the month grid
//! - `select`: a dropdown after a sequence of picks
//! - `search`: records ranked against a query
//! - `latency`: persists the mock backend's latency knobs
//!
//! Configuration is read from `--config <file>` when given; every command
//! also works with the defaults.

use chrono::{Datelike, Month};
use clap::{Parser, Subcommand};
use classdesk::app::{LoadState, PageConfig};
use classdesk::domain::{DeskError, Record, SelectOption};
use classdesk::popup::ListenerRegistry;
use classdesk::search::{rank, score, SearchConfig};
use classdesk::select::{SelectControl, SelectionMode};
use classdesk::storage::{JsonStorage, LatencyConfig};
use classdesk::table::FieldMapping;
use classdesk::ui::components::render_calendar;
use classdesk::{initialize, observability, Config, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "classdesk", version, about = "School dashboard presentation core")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a table page from a JSON list of records.
    Table {
        records: PathBuf,
        /// Column mapping file, TOML with `[[columns]]` or a JSON array.
        #[arg(long, value_name = "FILE")]
        mapping: Option<PathBuf>,
        /// Column as `field=Label`; repeat for each column.
        #[arg(long = "column", value_name = "FIELD=LABEL", required_unless_present = "mapping")]
        columns: Vec<String>,
        /// Date column shown as `DD.MM.YYYY`.
        #[arg(long = "date-column", value_name = "FIELD=LABEL")]
        date_columns: Vec<String>,
        /// Age column computed from a birth date.
        #[arg(long = "age-column", value_name = "FIELD=LABEL")]
        age_columns: Vec<String>,
        /// Page title shown in the header.
        #[arg(long, default_value = "Records")]
        title: String,
        /// Show the loading skeleton instead of the rows.
        #[arg(long)]
        loading: bool,
        /// Apply a search query.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 24)]
        rows: usize,
        #[arg(long, default_value_t = 100)]
        cols: usize,
    },
    /// Print the month grid.
    Calendar {
        year: i32,
        /// Month number, 1 to 12.
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        month: u8,
    },
    /// Open a dropdown over a JSON list of options and apply picks.
    Select {
        options: PathBuf,
        /// Filter the visible options.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        multiple: bool,
        /// Index into the visible options; repeat to pick several.
        #[arg(long = "pick", value_name = "N")]
        picks: Vec<usize>,
    },
    /// Rank records against a query.
    Search {
        records: PathBuf,
        query: String,
        /// JSON search rules; inferred from the records when omitted.
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
    },
    /// Persist the mock backend's latency in milliseconds.
    Latency { base: u64, variance: u64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map_or_else(|| Ok(Config::default()), Config::from_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("classdesk: {e}");
            return ExitCode::FAILURE;
        }
    };
    observability::init_tracing(&config);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("classdesk: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Table {
            records,
            mapping,
            columns,
            date_columns,
            age_columns,
            title,
            loading,
            search,
            rows,
            cols,
        } => {
            let mapping = build_mapping(mapping.as_deref(), &columns, &date_columns, &age_columns)?;
            table(config, &records, mapping, &title, loading, search, rows, cols)
        }
        Command::Calendar { year, month } => calendar(config, year, month),
        Command::Select {
            options,
            search,
            multiple,
            picks,
        } => select(&options, search, multiple, &picks),
        Command::Search { records, query, rules } => search_records(&records, &query, rules.as_deref()),
        Command::Latency { base, variance } => latency(config, base, variance),
    }
}

/// Reads a record list: a JSON array or a `{"results": [...]}` page.
fn read_records(path: &Path) -> Result<Vec<Record>> {
    let contents = std::fs::read_to_string(path)?;
    let value: Record = serde_json::from_str(&contents)?;
    match value {
        Record::Array(items) => Ok(items),
        Record::Object(mut page) => match page.remove("results") {
            Some(Record::Array(items)) => Ok(items),
            _ => Err(DeskError::Config(format!("{} holds no record list", path.display()))),
        },
        _ => Err(DeskError::Config(format!("{} holds no record list", path.display()))),
    }
}

fn split_column(column: &str) -> Result<(&str, &str)> {
    column
        .split_once('=')
        .map(|(field, label)| (field.trim(), label.trim()))
        .ok_or_else(|| DeskError::Config(format!("column {column:?} is not `field=Label`")))
}

/// Columns from the mapping file first, then the command-line columns.
fn build_mapping(
    file: Option<&Path>,
    columns: &[String],
    date_columns: &[String],
    age_columns: &[String],
) -> Result<FieldMapping> {
    let mut mapping = match file {
        None => FieldMapping::new(),
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            if path.extension().is_some_and(|ext| ext == "json") {
                FieldMapping::from_json(&serde_json::from_str(&contents)?)?
            } else {
                FieldMapping::from_toml_str(&contents)?
            }
        }
    };

    for column in columns {
        let (field, label) = split_column(column)?;
        mapping = mapping.label(field, label);
    }
    for column in date_columns {
        let (field, label) = split_column(column)?;
        mapping = mapping.date(field, label);
    }
    let today = chrono::Local::now().date_naive();
    for column in age_columns {
        let (field, label) = split_column(column)?;
        mapping = mapping.age(field, label, today);
    }

    mapping.validate()?;
    Ok(mapping)
}

#[allow(clippy::too_many_arguments)]
fn table(
    config: &Config,
    path: &Path,
    mapping: FieldMapping,
    title: &str,
    loading: bool,
    search: Option<String>,
    rows: usize,
    cols: usize,
) -> Result<()> {
    let records = read_records(path)?;
    tracing::debug!(records = records.len(), columns = mapping.headers().len(), "rendering table");

    let mut state = initialize(config, PageConfig::new(title, "records", mapping));
    state.set_viewport(rows, cols);
    if loading {
        state.load_state = LoadState::Loading;
    } else {
        state.records = records;
        state.load_state = LoadState::Loaded;
    }
    if let Some(query) = search {
        state.search_input = query;
        state.flush_search();
    }
    state.relayout();

    let frame = classdesk::ui::render(&state)?;
    println!("\x1b[2J\x1b[H{frame}\x1b[{rows};1H\x1b[0m");
    Ok(())
}

fn calendar(config: &Config, year: i32, month: u8) -> Result<()> {
    let month = Month::try_from(month).map_err(|_| DeskError::DateParse(format!("no month {month}")))?;
    let weeks = classdesk::dates::month_matrix(year, month)?;

    let today = chrono::Local::now().date_naive();
    let highlight = (today.year() == year && today.month() == month.number_from_month()).then_some(today);

    let title = format!("{} {year}", month.name());
    print!("{}", render_calendar(&title, &weeks, highlight, &config.theme()));
    Ok(())
}

fn select(path: &Path, search: Option<String>, multiple: bool, picks: &[usize]) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let options: Vec<SelectOption> = serde_json::from_str(&contents)?;
    let mode = if multiple {
        SelectionMode::Multiple
    } else {
        SelectionMode::Single
    };

    let mut control = SelectControl::new(options, mode, ListenerRegistry::shared()).with_placeholder("Select");
    if search.is_some() {
        control = control.searchable();
    }

    for &index in picks {
        if !control.is_open() {
            control.toggle();
        }
        if let Some(query) = &search {
            control.set_search(query.clone());
        }
        let outcome = control.pick(index);
        tracing::debug!(index, ?outcome, "pick applied");
    }

    if !control.is_open() {
        control.toggle();
    }
    if let Some(query) = &search {
        control.set_search(query.clone());
    }

    println!("[{}]", control.button_label());
    for (index, option) in control.visible_options().into_iter().enumerate() {
        let marker = if control.is_selected(option) { '●' } else { '○' };
        println!("{index:>3} {marker} {}", option.label());
    }
    println!("{}", serde_json::to_string(&control.selection().to_json())?);
    Ok(())
}

fn search_records(path: &Path, query: &str, rules: Option<&Path>) -> Result<()> {
    let records = read_records(path)?;
    let config = match rules {
        Some(rules) => SearchConfig::from_json(&serde_json::from_str(&std::fs::read_to_string(rules)?)?)?,
        None => SearchConfig::infer_all(&records),
    };

    for record in rank(&records, &config, query) {
        let found = score(record, &config, query);
        println!("{:>8.2}  {:>3}  {record}", found.score, found.occurrences);
    }
    Ok(())
}

fn latency(config: &Config, base: u64, variance: u64) -> Result<()> {
    let mut storage = JsonStorage::new(config.state_file())?;
    LatencyConfig::new(base, variance).save(&mut storage)?;
    println!(
        "mock latency set to {base} ms + up to {variance} ms ({})",
        storage.path().display()
    );
    Ok(())
}
