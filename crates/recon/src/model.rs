use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Statistical columns shared by the entity table and the aggregate totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    GamesPlayed,
    Goals,
    Assists,
    Points,
    Shots,
    ShotsOnGoal,
    ShootingPct,
    GroundBalls,
    DrawControls,
    Turnovers,
    CausedTurnovers,
}

impl Stat {
    pub const ALL: [Stat; 11] = [
        Stat::GamesPlayed,
        Stat::Goals,
        Stat::Assists,
        Stat::Points,
        Stat::Shots,
        Stat::ShotsOnGoal,
        Stat::ShootingPct,
        Stat::GroundBalls,
        Stat::DrawControls,
        Stat::Turnovers,
        Stat::CausedTurnovers,
    ];

    /// Header used in the per-player CSV.
    pub fn entity_header(&self) -> &'static str {
        match self {
            Self::GamesPlayed => "GP",
            Self::Goals => "G",
            Self::Assists => "A",
            Self::Points => "Points",
            Self::Shots => "Shots",
            Self::ShotsOnGoal => "SOG",
            Self::ShootingPct => "ShtPct",
            Self::GroundBalls => "GB",
            Self::DrawControls => "DC",
            Self::Turnovers => "TO",
            Self::CausedTurnovers => "CT",
        }
    }

    /// Header used in the team totals CSV. Per-game and derived-only
    /// columns have no aggregate counterpart.
    pub fn aggregate_header(&self) -> Option<&'static str> {
        match self {
            Self::GamesPlayed | Self::Points => None,
            Self::Goals => Some("Goals"),
            Self::Assists => Some("Assists"),
            other => Some(other.entity_header()),
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::ShootingPct)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity_header())
    }
}

// ---------------------------------------------------------------------------
// Metric: numeric result with an explicit undefined sentinel
// ---------------------------------------------------------------------------

/// Result of a ratio-style formula. Division by zero yields `Undefined`,
/// which never compares equal to anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Defined(f64),
    Undefined,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Defined(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.value().is_some()
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Metric {
        match self.value() {
            Some(v) => Metric::from(f(v)),
            None => Metric::Undefined,
        }
    }

    pub fn round_to(self, decimals: u32) -> Metric {
        self.map(|v| crate::metrics::round_to(v, decimals))
    }
}

impl From<f64> for Metric {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Metric::Defined(v)
        } else {
            Metric::Undefined
        }
    }
}

// ---------------------------------------------------------------------------
// Value: what a report line shows on either side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Undefined,
}

impl Value {
    /// Numeric coercion used by the tolerance comparison. Text coerces when it
    /// parses as a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Undefined => return None,
        };
        v.is_finite().then_some(v)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Metric> for Value {
    fn from(m: Metric) -> Self {
        match m.value() {
            Some(v) => Value::Float(v),
            None => Value::Undefined,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // Integral floats keep one decimal (`60.0`) so they read as floats.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Self::Float(v) if v.is_finite() => write!(f, "{v}"),
            Self::Float(_) | Self::Undefined => write!(f, "nan"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Float(_) | Self::Undefined => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity table
// ---------------------------------------------------------------------------

/// Per-row values computed once by the derive step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedStats {
    pub points_per_game: Option<Metric>,
    /// Only set for rows with goals > 0 and assists > 0.
    pub goal_assist_ratio: Option<Metric>,
    pub shots_on_goal_pct: Option<Metric>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecord {
    pub name: String,
    pub games_played: Option<i64>,
    pub goals: Option<i64>,
    pub assists: Option<i64>,
    pub points: Option<i64>,
    pub shots: Option<i64>,
    pub shots_on_goal: Option<i64>,
    pub shooting_pct: Option<Metric>,
    pub ground_balls: Option<i64>,
    pub draw_controls: Option<i64>,
    pub turnovers: Option<i64>,
    pub caused_turnovers: Option<i64>,
    pub derived: DerivedStats,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Counting stat by column. Percentages are not counts and return `None`.
    pub fn count(&self, stat: Stat) -> Option<i64> {
        match stat {
            Stat::GamesPlayed => self.games_played,
            Stat::Goals => self.goals,
            Stat::Assists => self.assists,
            Stat::Points => self.points,
            Stat::Shots => self.shots,
            Stat::ShotsOnGoal => self.shots_on_goal,
            Stat::GroundBalls => self.ground_balls,
            Stat::DrawControls => self.draw_controls,
            Stat::Turnovers => self.turnovers,
            Stat::CausedTurnovers => self.caused_turnovers,
            Stat::ShootingPct => None,
        }
    }

    pub fn set_count(&mut self, stat: Stat, value: Option<i64>) {
        match stat {
            Stat::GamesPlayed => self.games_played = value,
            Stat::Goals => self.goals = value,
            Stat::Assists => self.assists = value,
            Stat::Points => self.points = value,
            Stat::Shots => self.shots = value,
            Stat::ShotsOnGoal => self.shots_on_goal = value,
            Stat::GroundBalls => self.ground_balls = value,
            Stat::DrawControls => self.draw_controls = value,
            Stat::Turnovers => self.turnovers = value,
            Stat::CausedTurnovers => self.caused_turnovers = value,
            Stat::ShootingPct => {}
        }
    }
}

/// Case- and whitespace-insensitive form of an entity name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    /// Columns present in the table, including synthesized ones.
    pub columns: BTreeSet<Stat>,
    /// Rows in input order.
    pub rows: Vec<EntityRecord>,
    /// Columns added by the derive step rather than read from input.
    pub synthesized: Vec<Stat>,
    pub(crate) derived: bool,
}

impl EntityTable {
    pub fn new(columns: impl IntoIterator<Item = Stat>, rows: Vec<EntityRecord>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows,
            synthesized: Vec::new(),
            derived: false,
        }
    }

    pub fn has(&self, stat: Stat) -> bool {
        self.columns.contains(&stat)
    }

    pub fn has_all(&self, stats: &[Stat]) -> bool {
        stats.iter().all(|s| self.has(*s))
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// First row whose normalized name matches.
    pub fn find(&self, name: &str) -> Option<&EntityRecord> {
        let wanted = normalize_name(name);
        self.rows.iter().find(|r| normalize_name(&r.name) == wanted)
    }

    /// Sum of a counting column over all rows; blank cells count as zero.
    /// `None` when the column is absent or the sum overflows.
    pub fn column_sum(&self, stat: Stat) -> Option<i64> {
        if !self.has(stat) {
            return None;
        }
        self.rows
            .iter()
            .filter_map(|r| r.count(stat))
            .try_fold(0i64, |acc, v| acc.checked_add(v))
    }
}

// ---------------------------------------------------------------------------
// Aggregate totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AggregateTotals {
    pub columns: BTreeSet<Stat>,
    pub goals: Option<i64>,
    pub assists: Option<i64>,
    pub shots: Option<i64>,
    pub shots_on_goal: Option<i64>,
    pub shooting_pct: Option<Metric>,
    pub ground_balls: Option<i64>,
    pub draw_controls: Option<i64>,
    pub turnovers: Option<i64>,
    pub caused_turnovers: Option<i64>,
}

impl AggregateTotals {
    pub fn has(&self, stat: Stat) -> bool {
        self.columns.contains(&stat)
    }

    pub fn has_all(&self, stats: &[Stat]) -> bool {
        stats.iter().all(|s| self.has(*s))
    }

    pub fn count(&self, stat: Stat) -> Option<i64> {
        match stat {
            Stat::Goals => self.goals,
            Stat::Assists => self.assists,
            Stat::Shots => self.shots,
            Stat::ShotsOnGoal => self.shots_on_goal,
            Stat::GroundBalls => self.ground_balls,
            Stat::DrawControls => self.draw_controls,
            Stat::Turnovers => self.turnovers,
            Stat::CausedTurnovers => self.caused_turnovers,
            Stat::GamesPlayed | Stat::Points | Stat::ShootingPct => None,
        }
    }

    pub fn set_count(&mut self, stat: Stat, value: Option<i64>) {
        match stat {
            Stat::Goals => self.goals = value,
            Stat::Assists => self.assists = value,
            Stat::Shots => self.shots = value,
            Stat::ShotsOnGoal => self.shots_on_goal = value,
            Stat::GroundBalls => self.ground_balls = value,
            Stat::DrawControls => self.draw_controls = value,
            Stat::Turnovers => self.turnovers = value,
            Stat::CausedTurnovers => self.caused_turnovers = value,
            Stat::GamesPlayed | Stat::Points | Stat::ShootingPct => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Check results
// ---------------------------------------------------------------------------

/// Question number of a check (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CheckId(pub u8);

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// One computed quantity, before it is paired with its expected value.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub label: &'static str,
    pub actual: Value,
}

impl Observation {
    pub fn new(label: &'static str, actual: impl Into<Value>) -> Self {
        Self { label, actual: actual.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: CheckId,
    pub label: String,
    pub expected: Value,
    pub actual: Value,
    /// `actual - expected` when both sides are numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    pub status: Status,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedCheck {
    pub check: CheckId,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub checks_run: usize,
    pub checks_skipped: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub tolerance: f64,
    pub match_names: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub meta: RunMeta,
    pub summary: ValidationSummary,
    pub results: Vec<CheckResult>,
    pub skipped: Vec<SkippedCheck>,
}
