//! Derived columns: computed once over the loaded tables, before any check runs.

use crate::metrics::{percentage, ratio};
use crate::model::{AggregateTotals, DerivedStats, EntityTable, Metric, Stat};

/// Both input tables after the derive step. Read-only for the check battery.
#[derive(Debug, Clone)]
pub struct Tables {
    pub entities: EntityTable,
    pub totals: AggregateTotals,
}

impl Tables {
    /// Apply the derive step to freshly loaded tables.
    pub fn derive(mut entities: EntityTable, totals: AggregateTotals) -> Self {
        derive_columns(&mut entities);
        Self { entities, totals }
    }
}

/// Synthesize missing `Points` / `ShtPct` columns and fill per-row derived stats.
///
/// Runs at most once per table: a second call is a no-op, and a `Points` or
/// `ShtPct` column supplied by the input is never recomputed.
pub fn derive_columns(table: &mut EntityTable) {
    if table.derived {
        return;
    }
    table.derived = true;

    if !table.has(Stat::Points) && table.has_all(&[Stat::Goals, Stat::Assists]) {
        for row in &mut table.rows {
            row.points = match (row.goals, row.assists) {
                (Some(g), Some(a)) => g.checked_add(a),
                _ => None,
            };
        }
        synthesize(table, Stat::Points);
    }

    if !table.has(Stat::ShootingPct) && table.has_all(&[Stat::Goals, Stat::Shots]) {
        for row in &mut table.rows {
            row.shooting_pct = match (row.goals, row.shots) {
                (Some(g), Some(s)) => Some(percentage(g as f64, s as f64).round_to(1)),
                _ => None,
            };
        }
        synthesize(table, Stat::ShootingPct);
    }

    let per_game = table.has_all(&[Stat::Points, Stat::GamesPlayed]);
    let goal_assist = table.has_all(&[Stat::Goals, Stat::Assists]);
    let on_goal = table.has_all(&[Stat::ShotsOnGoal, Stat::Shots]);

    for row in &mut table.rows {
        let mut derived = DerivedStats::default();
        if per_game {
            derived.points_per_game = count_ratio(row.points, row.games_played, 2);
        }
        if goal_assist {
            derived.goal_assist_ratio = match (row.goals, row.assists) {
                (Some(g), Some(a)) if g > 0 && a > 0 => count_ratio(Some(g), Some(a), 2),
                _ => None,
            };
        }
        if on_goal {
            derived.shots_on_goal_pct = match (row.shots_on_goal, row.shots) {
                (Some(sog), Some(s)) => Some(percentage(sog as f64, s as f64).round_to(1)),
                _ => None,
            };
        }
        row.derived = derived;
    }
}

fn count_ratio(numerator: Option<i64>, denominator: Option<i64>, decimals: u32) -> Option<Metric> {
    Some(ratio(numerator? as f64, denominator? as f64).round_to(decimals))
}

fn synthesize(table: &mut EntityTable, stat: Stat) {
    log::debug!("synthesized {stat} column for {} rows", table.rows.len());
    table.columns.insert(stat);
    table.synthesized.push(stat);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityRecord;

    fn player(name: &str, gp: i64, g: i64, a: i64, shots: i64, sog: i64) -> EntityRecord {
        EntityRecord {
            games_played: Some(gp),
            goals: Some(g),
            assists: Some(a),
            shots: Some(shots),
            shots_on_goal: Some(sog),
            ..EntityRecord::new(name)
        }
    }

    fn raw_columns() -> Vec<Stat> {
        vec![Stat::GamesPlayed, Stat::Goals, Stat::Assists, Stat::Shots, Stat::ShotsOnGoal]
    }

    #[test]
    fn synthesizes_points_and_shooting_pct() {
        let mut table = EntityTable::new(raw_columns(), vec![player("Emma Ward", 19, 57, 34, 111, 90)]);
        derive_columns(&mut table);

        let ew = &table.rows[0];
        assert_eq!(ew.points, Some(91));
        assert_eq!(ew.shooting_pct, Some(Metric::Defined(51.4)));
        assert_eq!(ew.derived.points_per_game, Some(Metric::Defined(4.79)));
        assert_eq!(ew.derived.goal_assist_ratio, Some(Metric::Defined(1.68)));
        assert_eq!(ew.derived.shots_on_goal_pct, Some(Metric::Defined(81.1)));
        assert_eq!(table.synthesized, vec![Stat::Points, Stat::ShootingPct]);
        assert!(table.has(Stat::Points));
    }

    #[test]
    fn supplied_points_never_recomputed() {
        let mut row = player("a", 10, 5, 5, 20, 10);
        row.points = Some(99);
        let mut columns = raw_columns();
        columns.push(Stat::Points);
        let mut table = EntityTable::new(columns, vec![row]);

        derive_columns(&mut table);
        assert_eq!(table.rows[0].points, Some(99));
        assert!(!table.synthesized.contains(&Stat::Points));
        assert_eq!(table.rows[0].derived.points_per_game, Some(Metric::Defined(9.9)));
    }

    #[test]
    fn overflowing_points_are_blank() {
        let mut table = EntityTable::new(raw_columns(), vec![player("a", 19, i64::MAX, 1, 20, 10)]);
        derive_columns(&mut table);
        let row = &table.rows[0];
        assert_eq!(row.points, None);
        assert_eq!(row.derived.points_per_game, None);
        assert!(table.synthesized.contains(&Stat::Points));
    }

    #[test]
    fn derive_runs_once() {
        let mut table = EntityTable::new(raw_columns(), vec![player("a", 10, 5, 5, 20, 10)]);
        derive_columns(&mut table);
        table.rows[0].goals = Some(0);
        derive_columns(&mut table);
        assert_eq!(table.rows[0].points, Some(10));
        assert_eq!(table.synthesized.len(), 2);
    }

    #[test]
    fn zero_denominators_are_undefined() {
        let mut table = EntityTable::new(raw_columns(), vec![player("a", 0, 0, 3, 0, 0)]);
        derive_columns(&mut table);
        let row = &table.rows[0];
        assert_eq!(row.shooting_pct, Some(Metric::Undefined));
        assert_eq!(row.derived.points_per_game, Some(Metric::Undefined));
        assert_eq!(row.derived.shots_on_goal_pct, Some(Metric::Undefined));
        // goals == 0 excludes the row from the goal/assist ratio
        assert_eq!(row.derived.goal_assist_ratio, None);
    }

    #[test]
    fn nothing_derived_without_source_columns() {
        let mut table = EntityTable::new([Stat::Goals], vec![EntityRecord::new("a")]);
        derive_columns(&mut table);
        assert!(!table.has(Stat::Points));
        assert!(!table.has(Stat::ShootingPct));
        assert_eq!(table.rows[0].derived, DerivedStats::default());
    }
}
