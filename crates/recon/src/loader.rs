//! CSV table loading. This is the only place that touches the filesystem.

use std::path::{Path, PathBuf};

use crate::derived::Tables;
use crate::error::ReconError;
use crate::model::{AggregateTotals, EntityRecord, EntityTable, Metric, Stat};

pub const PLAYERS_TABLE: &str = "players";
pub const TEAM_TABLE: &str = "team_totals";

/// Identity column of the per-player CSV.
pub const NAME_COLUMN: &str = "Player";

/// Anything that can produce the two input tables.
pub trait TableSource {
    fn load(&self) -> Result<Tables, ReconError>;
}

/// The two CSV files extracted from the source document.
#[derive(Debug, Clone)]
pub struct CsvTables {
    pub players: PathBuf,
    pub team_totals: PathBuf,
}

impl CsvTables {
    pub fn new(players: impl Into<PathBuf>, team_totals: impl Into<PathBuf>) -> Self {
        Self {
            players: players.into(),
            team_totals: team_totals.into(),
        }
    }

    /// `players.csv` and `team_totals.csv` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("players.csv"), dir.join("team_totals.csv"))
    }
}

impl TableSource for CsvTables {
    fn load(&self) -> Result<Tables, ReconError> {
        let players = read_file(&self.players)?;
        let team = read_file(&self.team_totals)?;
        let entities = load_entity_table(&players)?;
        let totals = load_aggregate_totals(&team)?;
        log::info!(
            "loaded {} player rows from {}, team totals from {}",
            entities.rows.len(),
            self.players.display(),
            self.team_totals.display()
        );
        Ok(Tables::derive(entities, totals))
    }
}

fn read_file(path: &Path) -> Result<String, ReconError> {
    std::fs::read_to_string(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn read_headers(table: &str, reader: &mut csv::Reader<&[u8]>) -> Result<Vec<String>, ReconError> {
    Ok(reader
        .headers()
        .map_err(|e| csv_error(table, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect())
}

fn csv_reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes())
}

/// Parse the per-player CSV. Only `Player` is required; every stat column is optional.
pub fn load_entity_table(csv_data: &str) -> Result<EntityTable, ReconError> {
    let mut reader = csv_reader(csv_data);
    let headers = read_headers(PLAYERS_TABLE, &mut reader)?;

    let name_idx = headers.iter().position(|h| h == NAME_COLUMN).ok_or_else(|| {
        ReconError::MissingColumn {
            table: PLAYERS_TABLE.into(),
            column: NAME_COLUMN.into(),
        }
    })?;

    let stat_idx: Vec<(Stat, usize)> = Stat::ALL
        .iter()
        .filter_map(|stat| {
            headers
                .iter()
                .position(|h| h == stat.entity_header())
                .map(|i| (*stat, i))
        })
        .collect();

    let mut rows = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(PLAYERS_TABLE, e))?;
        let row = n + 1;

        let mut entity = EntityRecord::new(record.get(name_idx).unwrap_or("").trim());
        for &(stat, i) in &stat_idx {
            let raw = record.get(i).unwrap_or("");
            if stat.is_percentage() {
                entity.shooting_pct = parse_percentage(PLAYERS_TABLE, row, stat, raw)?;
            } else {
                entity.set_count(stat, parse_count(PLAYERS_TABLE, row, stat, raw)?);
            }
        }
        rows.push(entity);
    }

    Ok(EntityTable::new(stat_idx.into_iter().map(|(s, _)| s), rows))
}

/// Parse the team totals CSV. The first data row is the aggregate record.
pub fn load_aggregate_totals(csv_data: &str) -> Result<AggregateTotals, ReconError> {
    let mut reader = csv_reader(csv_data);
    let headers = read_headers(TEAM_TABLE, &mut reader)?;

    let stat_idx: Vec<(Stat, usize)> = Stat::ALL
        .iter()
        .filter_map(|stat| {
            let header = stat.aggregate_header()?;
            headers.iter().position(|h| h == header).map(|i| (*stat, i))
        })
        .collect();

    let mut records = reader.records();
    let record = match records.next() {
        Some(record) => record.map_err(|e| csv_error(TEAM_TABLE, e))?,
        None => return Err(ReconError::EmptyTable(TEAM_TABLE.into())),
    };
    let extra = records.count();
    if extra > 0 {
        log::warn!("{TEAM_TABLE}: ignoring {extra} row(s) after the first");
    }

    let mut totals = AggregateTotals {
        columns: stat_idx.iter().map(|(s, _)| *s).collect(),
        ..AggregateTotals::default()
    };
    for &(stat, i) in &stat_idx {
        let raw = record.get(i).unwrap_or("");
        if stat.is_percentage() {
            totals.shooting_pct = parse_percentage(TEAM_TABLE, 1, stat, raw)?;
        } else {
            totals.set_count(stat, parse_count(TEAM_TABLE, 1, stat, raw)?);
        }
    }

    Ok(totals)
}

/// Counts are integers; integral floats (`57.0`) are accepted. Blank is `None`.
fn parse_count(table: &str, row: usize, stat: Stat, raw: &str) -> Result<Option<i64>, ReconError> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = s.parse::<i64>() {
        return Ok(Some(v));
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    match s.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
            Ok(Some(v as i64))
        }
        _ => Err(value_error(table, row, stat, s)),
    }
}

/// Percentages may carry a trailing `%`. Blank is `None`.
fn parse_percentage(
    table: &str,
    row: usize,
    stat: Stat,
    raw: &str,
) -> Result<Option<Metric>, ReconError> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let number = s.strip_suffix('%').unwrap_or(s).trim();
    number
        .parse::<f64>()
        .map(|v| Some(Metric::from(v)))
        .map_err(|_| value_error(table, row, stat, s))
}

/// Header of `stat` as it appears in `table`.
fn header(table: &str, stat: Stat) -> &'static str {
    if table == TEAM_TABLE {
        stat.aggregate_header().unwrap_or(stat.entity_header())
    } else {
        stat.entity_header()
    }
}

fn value_error(table: &str, row: usize, stat: Stat, value: &str) -> ReconError {
    ReconError::ValueParse {
        table: table.into(),
        row,
        column: header(table, stat).into(),
        value: value.into(),
    }
}

fn csv_error(table: &str, err: csv::Error) -> ReconError {
    ReconError::Csv {
        table: table.into(),
        message: err.to_string(),
    }
}
