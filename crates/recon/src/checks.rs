//! The fixed check battery.
//!
//! Each check is a descriptor: the columns it needs and a pure `compute`
//! function producing `(label, actual)` observations. Expected values are not
//! known here; the runner pairs observations with the answer key by label.

use crate::answer_key::Subjects;
use crate::derived::Tables;
use crate::metrics::{percentage, round_to};
use crate::model::{normalize_name, CheckId, EntityRecord, Metric, Observation, Stat, Value};

pub mod labels {
    pub const Q1_PLAYER: &str = "Q1 Player";
    pub const Q1_PLAYER_PCT: &str = "Q1 Player ShtPct";
    pub const Q1_TEAM_PCT: &str = "Q1 Team ShtPct";

    pub const Q2_SHOTS: &str = "Q2 Shots";
    pub const Q2_CURRENT_PCT: &str = "Q2 Current%";
    pub const Q2_CURRENT_GOALS: &str = "Q2 CurrentGoals";
    pub const Q2_HYPOTHETICAL_PCT: &str = "Q2 Hypothetical%";
    pub const Q2_HYPOTHETICAL_GOALS: &str = "Q2 HypotheticalGoals";
    pub const Q2_EXTRA_GOALS: &str = "Q2 ExtraGoals";

    pub const Q3_PLAYER_DC: &str = "Q3 Player DC";
    pub const Q3_TEAM_DC: &str = "Q3 Team DC";
    pub const Q3_DC_PCT: &str = "Q3 DC %";

    pub const Q4_PLAYER: &str = "Q4 Player";
    pub const Q4_PPG: &str = "Q4 PPG";

    pub const Q5_TEAM_ASSISTS: &str = "Q5 Team Assists";
    pub const Q5_ASSIST_PCT: &str = "Q5 EW Assist %";

    pub const Q6_EXTRA_GOALS: &str = "Q6 Extra Goals";

    pub const Q7_PLAYER: &str = "Q7 Player";
    pub const Q7_RATIO: &str = "Q7 G/A";

    pub const Q8_PLAYER: &str = "Q8 Player";
    pub const Q8_SOG_PCT: &str = "Q8 SOG %";

    pub const Q9_DC_TOTAL: &str = "Q9 OA DC total (hypothetical)";

    pub const Q10_GOALS_PER_SOG: &str = "Q10 NS goals per SOG %";
}

use labels::*;

/// Minimum goals for the Q1 shooting-percentage leaderboard.
pub const Q1_MIN_GOALS: i64 = 30;
/// Minimum goals for the Q8 shots-on-goal leaderboard.
pub const Q8_MIN_GOALS: i64 = 20;
/// Percentage points added to a player's shooting % in Q2.
pub const PLAYER_SHOOTING_BOOST: f64 = 5.0;
/// Percentage points added to the team's shooting % in Q6.
pub const TEAM_SHOOTING_BOOST: f64 = 3.0;
/// Two extra games at 15 draw controls each (Q9).
pub const EXTRA_DRAW_CONTROLS: i64 = 2 * 15;

/// `None` means the check's subject or one of its values is unavailable.
pub type ComputeFn = fn(&Tables, &Subjects) -> Option<Vec<Observation>>;

pub struct Check {
    pub id: CheckId,
    pub title: &'static str,
    pub labels: &'static [&'static str],
    /// Player-table columns that must be present (after the derive step).
    pub entity_columns: &'static [Stat],
    /// Team-totals columns that must be present.
    pub aggregate_columns: &'static [Stat],
    pub compute: ComputeFn,
}

impl Check {
    /// Required columns the tables lack, as headers.
    pub fn missing_columns(&self, tables: &Tables) -> Vec<String> {
        let entity = self
            .entity_columns
            .iter()
            .filter(|s| !tables.entities.has(**s))
            .map(|s| format!("players.{}", s.entity_header()));
        let aggregate = self
            .aggregate_columns
            .iter()
            .filter(|s| !tables.totals.has(**s))
            .map(|s| format!("team_totals.{}", s.aggregate_header().unwrap_or("?")));
        entity.chain(aggregate).collect()
    }
}

pub static BATTERY: [Check; 10] = [
    Check {
        id: CheckId(1),
        title: "highest shooting % among 30+ goal scorers vs team average",
        labels: &[Q1_PLAYER, Q1_PLAYER_PCT, Q1_TEAM_PCT],
        entity_columns: &[Stat::Goals, Stat::ShootingPct],
        aggregate_columns: &[],
        compute: shooting_leader,
    },
    Check {
        id: CheckId(2),
        title: "player goals at +5pp shooting",
        labels: &[
            Q2_SHOTS,
            Q2_CURRENT_PCT,
            Q2_CURRENT_GOALS,
            Q2_HYPOTHETICAL_PCT,
            Q2_HYPOTHETICAL_GOALS,
            Q2_EXTRA_GOALS,
        ],
        entity_columns: &[Stat::Goals, Stat::Shots],
        aggregate_columns: &[],
        compute: player_shooting_boost,
    },
    Check {
        id: CheckId(3),
        title: "player share of team draw controls",
        labels: &[Q3_PLAYER_DC, Q3_TEAM_DC, Q3_DC_PCT],
        entity_columns: &[Stat::DrawControls],
        aggregate_columns: &[],
        compute: draw_control_share,
    },
    Check {
        id: CheckId(4),
        title: "highest points per game",
        labels: &[Q4_PLAYER, Q4_PPG],
        entity_columns: &[Stat::GamesPlayed, Stat::Points],
        aggregate_columns: &[],
        compute: points_per_game_leader,
    },
    Check {
        id: CheckId(5),
        title: "player share of team assists",
        labels: &[Q5_TEAM_ASSISTS, Q5_ASSIST_PCT],
        entity_columns: &[Stat::Assists],
        aggregate_columns: &[],
        compute: assist_share,
    },
    Check {
        id: CheckId(6),
        title: "team goals at +3pp shooting",
        labels: &[Q6_EXTRA_GOALS],
        entity_columns: &[],
        aggregate_columns: &[Stat::Shots, Stat::Goals],
        compute: team_shooting_boost,
    },
    Check {
        id: CheckId(7),
        title: "player goal/assist ratio",
        labels: &[Q7_PLAYER, Q7_RATIO],
        entity_columns: &[Stat::Goals, Stat::Assists],
        aggregate_columns: &[],
        compute: goal_assist_ratio,
    },
    Check {
        id: CheckId(8),
        title: "highest shots-on-goal % among 20+ goal scorers",
        labels: &[Q8_PLAYER, Q8_SOG_PCT],
        entity_columns: &[Stat::Goals, Stat::ShotsOnGoal, Stat::Shots],
        aggregate_columns: &[],
        compute: shots_on_goal_leader,
    },
    Check {
        id: CheckId(9),
        title: "player draw controls after two more games",
        labels: &[Q9_DC_TOTAL],
        entity_columns: &[Stat::DrawControls],
        aggregate_columns: &[],
        compute: draw_control_projection,
    },
    Check {
        id: CheckId(10),
        title: "player goals per shot on goal",
        labels: &[Q10_GOALS_PER_SOG],
        entity_columns: &[Stat::Goals, Stat::ShotsOnGoal],
        aggregate_columns: &[],
        compute: goals_per_shot_on_goal,
    },
];

/// Every label the battery can emit, in report order.
pub fn all_labels() -> Vec<&'static str> {
    BATTERY.iter().flat_map(|c| c.labels.iter().copied()).collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Top row by `key`. Ties go to the earliest row; rows without a defined key
/// rank last, so with no defined keys at all the first row is returned.
pub fn leader<'a>(
    rows: impl IntoIterator<Item = &'a EntityRecord>,
    key: impl Fn(&EntityRecord) -> Option<Metric>,
) -> Option<&'a EntityRecord> {
    let mut first = None;
    let mut best: Option<(&'a EntityRecord, f64)> = None;
    for row in rows {
        first.get_or_insert(row);
        if let Some(v) = key(row).and_then(|m| m.value()) {
            if best.map_or(true, |(_, b)| v > b) {
                best = Some((row, v));
            }
        }
    }
    best.map(|(row, _)| row).or(first)
}

/// Team total for a stat: the aggregate record when it has the column,
/// otherwise the sum over the player table.
fn team_total(tables: &Tables, stat: Stat) -> Option<i64> {
    if tables.totals.has(stat) {
        tables.totals.count(stat)
    } else {
        tables.entities.column_sum(stat)
    }
}

fn metric(m: Option<Metric>) -> Value {
    m.map(Value::from).unwrap_or(Value::Undefined)
}

/// Whole-number quantity (goals) derived from a metric.
fn whole(m: Metric) -> Value {
    match m.value() {
        Some(v) => Value::Int(v as i64),
        None => Value::Undefined,
    }
}

fn pct(numerator: i64, denominator: i64) -> Metric {
    percentage(numerator as f64, denominator as f64)
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn shooting_leader(tables: &Tables, _: &Subjects) -> Option<Vec<Observation>> {
    let mut out = Vec::new();

    let scorers = tables
        .entities
        .rows
        .iter()
        .filter(|r| r.goals.is_some_and(|g| g >= Q1_MIN_GOALS));
    if let Some(top) = leader(scorers, |r| r.shooting_pct) {
        out.push(Observation::new(Q1_PLAYER, top.name.as_str()));
        out.push(Observation::new(Q1_PLAYER_PCT, metric(top.shooting_pct)));
    }

    let totals = &tables.totals;
    if totals.has_all(&[Stat::Shots, Stat::Goals]) {
        if let (Some(goals), Some(shots)) = (totals.goals, totals.shots) {
            out.push(Observation::new(Q1_TEAM_PCT, pct(goals, shots).round_to(1)));
        }
    }

    Some(out)
}

fn player_shooting_boost(tables: &Tables, subjects: &Subjects) -> Option<Vec<Observation>> {
    let player = tables.entities.find(&subjects.q2)?;
    let shots = player.shots?;
    let goals = player.goals?;

    let current = pct(goals, shots).round_to(1);
    let hypothetical = current.map(|c| c + PLAYER_SHOOTING_BOOST).round_to(1);
    let hypothetical_goals = hypothetical.map(|h| round_to(shots as f64 * h / 100.0, 0));
    let extra = hypothetical_goals.map(|h| h - goals as f64);

    Some(vec![
        Observation::new(Q2_SHOTS, shots),
        Observation::new(Q2_CURRENT_PCT, current),
        Observation::new(Q2_CURRENT_GOALS, goals),
        Observation::new(Q2_HYPOTHETICAL_PCT, hypothetical),
        Observation::new(Q2_HYPOTHETICAL_GOALS, whole(hypothetical_goals)),
        Observation::new(Q2_EXTRA_GOALS, whole(extra)),
    ])
}

fn draw_control_share(tables: &Tables, subjects: &Subjects) -> Option<Vec<Observation>> {
    let player = tables.entities.find(&subjects.q3)?;
    let player_dc = player.draw_controls?;
    let team_dc = team_total(tables, Stat::DrawControls)?;

    Some(vec![
        Observation::new(Q3_PLAYER_DC, player_dc),
        Observation::new(Q3_TEAM_DC, team_dc),
        Observation::new(Q3_DC_PCT, pct(player_dc, team_dc).round_to(1)),
    ])
}

fn points_per_game_leader(tables: &Tables, _: &Subjects) -> Option<Vec<Observation>> {
    let top = leader(&tables.entities.rows, |r| r.derived.points_per_game)?;
    Some(vec![
        Observation::new(Q4_PLAYER, top.name.as_str()),
        Observation::new(Q4_PPG, metric(top.derived.points_per_game)),
    ])
}

fn assist_share(tables: &Tables, subjects: &Subjects) -> Option<Vec<Observation>> {
    let player = tables.entities.find(&subjects.q5)?;
    let assists = player.assists?;
    let team_assists = team_total(tables, Stat::Assists)?;

    Some(vec![
        Observation::new(Q5_TEAM_ASSISTS, team_assists),
        Observation::new(Q5_ASSIST_PCT, pct(assists, team_assists).round_to(1)),
    ])
}

fn team_shooting_boost(tables: &Tables, _: &Subjects) -> Option<Vec<Observation>> {
    let shots = tables.totals.shots?;
    let goals = tables.totals.goals?;

    // The team percentage is not rounded before the boost.
    let hypothetical = pct(goals, shots).map(|c| c + TEAM_SHOOTING_BOOST);
    let hypothetical_goals = hypothetical.map(|h| round_to(shots as f64 * h / 100.0, 0));
    let extra = hypothetical_goals.map(|h| h - goals as f64);

    Some(vec![Observation::new(Q6_EXTRA_GOALS, whole(extra))])
}

/// Reports the named player's ratio directly; there is no search for the
/// ratio closest to 1.0.
fn goal_assist_ratio(tables: &Tables, subjects: &Subjects) -> Option<Vec<Observation>> {
    let wanted = normalize_name(&subjects.q7);
    let player = tables
        .entities
        .rows
        .iter()
        .filter(|r| r.derived.goal_assist_ratio.is_some())
        .find(|r| normalize_name(&r.name) == wanted)?;

    Some(vec![
        Observation::new(Q7_PLAYER, player.name.as_str()),
        Observation::new(Q7_RATIO, metric(player.derived.goal_assist_ratio)),
    ])
}

fn shots_on_goal_leader(tables: &Tables, _: &Subjects) -> Option<Vec<Observation>> {
    let scorers = tables
        .entities
        .rows
        .iter()
        .filter(|r| r.goals.is_some_and(|g| g >= Q8_MIN_GOALS));
    let top = leader(scorers, |r| r.derived.shots_on_goal_pct)?;

    Some(vec![
        Observation::new(Q8_PLAYER, top.name.as_str()),
        Observation::new(Q8_SOG_PCT, metric(top.derived.shots_on_goal_pct)),
    ])
}

fn draw_control_projection(tables: &Tables, subjects: &Subjects) -> Option<Vec<Observation>> {
    let player = tables.entities.find(&subjects.q9)?;
    let base = player.draw_controls?;
    let projected = base
        .checked_add(EXTRA_DRAW_CONTROLS)
        .map_or(Value::Undefined, Value::Int);
    Some(vec![Observation::new(Q9_DC_TOTAL, projected)])
}

fn goals_per_shot_on_goal(tables: &Tables, subjects: &Subjects) -> Option<Vec<Observation>> {
    let player = tables.entities.find(&subjects.q10)?;
    let goals = player.goals?;
    let on_goal = player.shots_on_goal?;
    Some(vec![Observation::new(Q10_GOALS_PER_SOG, pct(goals, on_goal).round_to(1))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer_key::AnswerKey;
    use crate::model::{AggregateTotals, EntityTable};

    fn subjects() -> Subjects {
        AnswerKey::builtin().unwrap().subjects
    }

    fn row(name: &str, goals: i64, shots: i64) -> EntityRecord {
        EntityRecord {
            goals: Some(goals),
            shots: Some(shots),
            ..EntityRecord::new(name)
        }
    }

    fn tables(columns: &[Stat], rows: Vec<EntityRecord>, totals: AggregateTotals) -> Tables {
        Tables::derive(EntityTable::new(columns.iter().copied(), rows), totals)
    }

    fn team(shots: i64, goals: i64) -> AggregateTotals {
        AggregateTotals {
            columns: [Stat::Shots, Stat::Goals].into_iter().collect(),
            shots: Some(shots),
            goals: Some(goals),
            ..AggregateTotals::default()
        }
    }

    fn actual(obs: &[Observation], label: &str) -> Value {
        obs.iter().find(|o| o.label == label).map(|o| o.actual.clone()).unwrap()
    }

    #[test]
    fn labels_are_unique() {
        let labels = all_labels();
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), labels.len());
    }

    #[test]
    fn q1_single_player_recomputes_shooting_pct() {
        let t = tables(
            &[Stat::Goals, Stat::Shots],
            vec![row("Test Player", 30, 58)],
            AggregateTotals::default(),
        );
        let obs = shooting_leader(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q1_PLAYER), Value::from("Test Player"));
        assert_eq!(actual(&obs, Q1_PLAYER_PCT), Value::Float(51.7));
        // no team totals → no team line
        assert_eq!(obs.len(), 2);
    }

    #[test]
    fn q1_filters_and_breaks_ties_by_order() {
        let t = tables(
            &[Stat::Goals, Stat::Shots],
            vec![
                row("Low Volume", 29, 30),
                row("First", 38, 74),
                row("Second", 57, 111),
            ],
            team(833, 355),
        );
        let obs = shooting_leader(&t, &subjects()).unwrap();
        // 38/74 and 57/111 both round to 51.4; the earlier row wins
        assert_eq!(actual(&obs, Q1_PLAYER), Value::from("First"));
        assert_eq!(actual(&obs, Q1_TEAM_PCT), Value::Float(42.6));
    }

    #[test]
    fn q1_team_line_without_qualifying_players() {
        let t = tables(&[Stat::Goals, Stat::Shots], vec![row("a", 3, 10)], team(833, 355));
        let obs = shooting_leader(&t, &subjects()).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].label, Q1_TEAM_PCT);
    }

    #[test]
    fn q2_hypothetical_goals() {
        let t = tables(
            &[Stat::Goals, Stat::Shots],
            vec![row("Emma Ward", 57, 111)],
            AggregateTotals::default(),
        );
        let obs = player_shooting_boost(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q2_SHOTS), Value::Int(111));
        assert_eq!(actual(&obs, Q2_CURRENT_PCT), Value::Float(51.4));
        assert_eq!(actual(&obs, Q2_CURRENT_GOALS), Value::Int(57));
        assert_eq!(actual(&obs, Q2_HYPOTHETICAL_PCT), Value::Float(56.4));
        assert_eq!(actual(&obs, Q2_HYPOTHETICAL_GOALS), Value::Int(63));
        assert_eq!(actual(&obs, Q2_EXTRA_GOALS), Value::Int(6));
    }

    #[test]
    fn q2_zero_shots_is_undefined() {
        let t = tables(
            &[Stat::Goals, Stat::Shots],
            vec![row("Emma Ward", 0, 0)],
            AggregateTotals::default(),
        );
        let obs = player_shooting_boost(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q2_CURRENT_PCT), Value::Undefined);
        assert_eq!(actual(&obs, Q2_EXTRA_GOALS), Value::Undefined);
    }

    #[test]
    fn q2_missing_subject_emits_nothing() {
        let t = tables(
            &[Stat::Goals, Stat::Shots],
            vec![row("Someone Else", 57, 111)],
            AggregateTotals::default(),
        );
        assert!(player_shooting_boost(&t, &subjects()).is_none());
    }

    #[test]
    fn q3_falls_back_to_player_sum() {
        let mut oa = EntityRecord::new("Olivia Adamson");
        oa.draw_controls = Some(144);
        let mut other = EntityRecord::new("Other");
        other.draw_controls = Some(232);
        let t = tables(&[Stat::DrawControls], vec![oa, other], team(833, 355));

        let obs = draw_control_share(&t, &subjects()).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(actual(&obs, Q3_PLAYER_DC), Value::Int(144));
        assert_eq!(actual(&obs, Q3_TEAM_DC), Value::Int(376));
        assert_eq!(actual(&obs, Q3_DC_PCT), Value::Float(38.3));
    }

    #[test]
    fn q3_prefers_aggregate() {
        let mut oa = EntityRecord::new("olivia adamson ");
        oa.draw_controls = Some(144);
        let mut totals = team(833, 355);
        totals.columns.insert(Stat::DrawControls);
        totals.draw_controls = Some(400);
        let t = tables(&[Stat::DrawControls], vec![oa], totals);

        let obs = draw_control_share(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q3_TEAM_DC), Value::Int(400));
        assert_eq!(actual(&obs, Q3_DC_PCT), Value::Float(36.0));
    }

    #[test]
    fn q6_team_boost() {
        let t = tables(&[], vec![], team(1000, 390));
        let obs = team_shooting_boost(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q6_EXTRA_GOALS), Value::Int(30));

        let t = tables(&[], vec![], team(833, 355));
        let obs = team_shooting_boost(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q6_EXTRA_GOALS), Value::Int(25));
    }

    #[test]
    fn q7_reports_named_player_not_most_balanced() {
        let mut balanced = EntityRecord::new("Balanced");
        balanced.goals = Some(10);
        balanced.assists = Some(10);
        let mut et = EntityRecord::new("Emma Tyrrell");
        et.goals = Some(44);
        et.assists = Some(20);
        let t = tables(&[Stat::Goals, Stat::Assists], vec![balanced, et], AggregateTotals::default());

        let obs = goal_assist_ratio(&t, &subjects()).unwrap();
        assert_eq!(actual(&obs, Q7_PLAYER), Value::from("Emma Tyrrell"));
        assert_eq!(actual(&obs, Q7_RATIO), Value::Float(2.2));
    }

    #[test]
    fn q7_requires_goals_and_assists() {
        let mut et = EntityRecord::new("Emma Tyrrell");
        et.goals = Some(44);
        et.assists = Some(0);
        let t = tables(&[Stat::Goals, Stat::Assists], vec![et], AggregateTotals::default());
        assert!(goal_assist_ratio(&t, &subjects()).is_none());
    }

    #[test]
    fn q9_adds_two_games_of_draw_controls() {
        let mut oa = EntityRecord::new("Olivia Adamson");
        oa.draw_controls = Some(144);
        let t = tables(&[Stat::DrawControls], vec![oa], AggregateTotals::default());
        let obs = draw_control_projection(&t, &subjects()).unwrap();
        assert_eq!(obs, vec![Observation::new(Q9_DC_TOTAL, 174_i64)]);
    }

    #[test]
    fn q10_zero_shots_on_goal() {
        let mut ns = EntityRecord::new("Natalie Smith");
        ns.goals = Some(0);
        ns.shots_on_goal = Some(0);
        let t = tables(&[Stat::Goals, Stat::ShotsOnGoal], vec![ns], AggregateTotals::default());
        let obs = goals_per_shot_on_goal(&t, &subjects()).unwrap();
        assert_eq!(obs[0].actual, Value::Undefined);
    }

    #[test]
    fn leader_ranks_undefined_last() {
        let rows = vec![EntityRecord::new("a"), EntityRecord::new("b"), EntityRecord::new("c")];
        let keys = [Metric::Undefined, Metric::Defined(1.0), Metric::Defined(1.0)];
        let top = leader(&rows, |r| {
            let i = rows.iter().position(|x| x.name == r.name).unwrap();
            Some(keys[i])
        });
        assert_eq!(top.unwrap().name, "b");

        let top = leader(&rows, |_| None);
        assert_eq!(top.unwrap().name, "a");

        let empty: Vec<EntityRecord> = Vec::new();
        assert!(leader(&empty, |r| r.shooting_pct).is_none());
    }

    #[test]
    fn missing_columns_lists_headers() {
        let t = tables(&[Stat::Goals], vec![], AggregateTotals::default());
        let q8 = &BATTERY[7];
        assert_eq!(q8.missing_columns(&t), vec!["players.SOG", "players.Shots"]);
        let q6 = &BATTERY[5];
        assert_eq!(q6.missing_columns(&t), vec!["team_totals.Shots", "team_totals.Goals"]);
    }
}
