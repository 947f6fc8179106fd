//! Cycle and streak derivation.
//!
//! Votes are the single source of truth for history. Cycles, streaks, stats,
//! and vote boards are all reconstructed from the raw vote list; nothing here
//! touches the database. Every function takes `today` explicitly so results
//! are reproducible in tests.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// One day's vote, stripped down to what history derivation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteDay {
    /// Calendar day the vote was cast for.
    pub date: NaiveDate,
    /// Whether the user reported doing the habit.
    pub yes: bool,
    /// Optional quantity, only meaningful for yes votes.
    pub quantity: Option<i32>,
}

/// Outcome recorded for a single day within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// The user voted yes.
    Completed,
    /// The user voted no.
    Failed,
}

/// A daily record within a cycle. Days without a vote produce no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub quantity: Option<i32>,
}

/// Whether a cycle is still running or has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Active,
    Finished,
}

/// One accountability cycle reconstructed from votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub cycle_number: i32,
    pub start_date: NaiveDate,
    /// `None` for the trailing window that has not run its full length yet.
    pub end_date: Option<NaiveDate>,
    pub status: CycleStatus,
    pub daily_records: Vec<DailyRecord>,
}

/// Per-cycle completion statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub completed: u32,
    pub failed: u32,
    /// Days with any record. Voteless days are not tracked.
    pub tracked: u32,
    /// completed / tracked as a whole percentage, rounded half up.
    pub completion_rate: u32,
}

/// Aggregate statistics across all cycles of one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total_cycles: u32,
    pub cycles_finished: u32,
    pub tracked_days: u32,
    /// completed / tracked pooled over all cycles, as a whole percentage.
    pub average_completion: u32,
}

/// Mark shown on the vote board for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMark {
    Yes,
    No,
    None,
}

/// One day on the current cycle's vote board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDay {
    pub date: NaiveDate,
    pub mark: BoardMark,
}

/// Partition votes into consecutive fixed-length windows starting at the
/// first vote date. Windows that contain no vote produce no cycle. A cycle
/// is active when its effective end date is within one day of `today`.
#[must_use]
pub fn build_cycles(votes: &[VoteDay], today: NaiveDate, cycle_days: u32) -> Vec<Cycle> {
    if votes.is_empty() || cycle_days == 0 {
        return Vec::new();
    }

    let by_date: BTreeMap<NaiveDate, VoteDay> = votes.iter().map(|v| (v.date, *v)).collect();
    let Some((&first, _)) = by_date.first_key_value() else {
        return Vec::new();
    };
    let Some((&last, _)) = by_date.last_key_value() else {
        return Vec::new();
    };

    let window = u64::from(cycle_days);
    let active_cutoff = today.pred_opt().unwrap_or(today);

    let mut cycles = Vec::new();
    let mut cycle_number = 1;
    let mut start = first;

    while start <= last {
        let Some(window_end) = start.checked_add_days(Days::new(window - 1)) else {
            break;
        };
        let effective_end = window_end.min(last);

        let daily_records: Vec<DailyRecord> = by_date
            .range(start..=effective_end)
            .map(|(&date, vote)| DailyRecord {
                date,
                status: if vote.yes {
                    DayStatus::Completed
                } else {
                    DayStatus::Failed
                },
                // Quantity is only retained for completed days.
                quantity: if vote.yes { vote.quantity } else { None },
            })
            .collect();

        if !daily_records.is_empty() {
            cycles.push(Cycle {
                cycle_number,
                start_date: start,
                end_date: if window_end > last {
                    None
                } else {
                    Some(window_end)
                },
                status: if effective_end >= active_cutoff {
                    CycleStatus::Active
                } else {
                    CycleStatus::Finished
                },
                daily_records,
            });
            cycle_number += 1;
        }

        let Some(next) = window_end.checked_add_days(Days::new(1)) else {
            break;
        };
        start = next;
    }

    cycles
}

/// Count consecutive yes days ending at `today` or yesterday.
///
/// The streak may begin today or yesterday (a vote for today is not required
/// to keep yesterday's streak alive); after that each counted vote must fall
/// exactly one day before the previous one. A no vote or a gap ends the walk.
#[must_use]
pub fn current_streak(votes: &[VoteDay], today: NaiveDate) -> u32 {
    let mut sorted: Vec<&VoteDay> = votes.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for vote in sorted {
        if !vote.yes {
            break;
        }
        let counted = match expected {
            None => {
                let gap = (today - vote.date).num_days();
                (0..=1).contains(&gap)
            }
            Some(date) => vote.date == date,
        };
        if !counted {
            break;
        }
        streak += 1;
        expected = vote.date.pred_opt();
        if expected.is_none() {
            break;
        }
    }

    streak
}

/// Expand the current cycle into a board of `cycle_days` days. Future days
/// are always `none`, regardless of any (invalid) future vote.
#[must_use]
pub fn vote_board(
    cycle_start: NaiveDate,
    votes: &[VoteDay],
    today: NaiveDate,
    cycle_days: u32,
) -> Vec<BoardDay> {
    let by_date: BTreeMap<NaiveDate, VoteDay> = votes.iter().map(|v| (v.date, *v)).collect();

    (0..u64::from(cycle_days))
        .filter_map(|offset| cycle_start.checked_add_days(Days::new(offset)))
        .map(|date| {
            let mark = if date > today {
                BoardMark::None
            } else {
                match by_date.get(&date) {
                    Some(vote) if vote.yes => BoardMark::Yes,
                    Some(_) => BoardMark::No,
                    None => BoardMark::None,
                }
            };
            BoardDay { date, mark }
        })
        .collect()
}

/// Completion statistics for one cycle.
#[must_use]
pub fn cycle_stats(cycle: &Cycle) -> CycleStats {
    let completed = cycle
        .daily_records
        .iter()
        .filter(|r| r.status == DayStatus::Completed)
        .count() as u32;
    let tracked = cycle.daily_records.len() as u32;

    CycleStats {
        completed,
        failed: tracked - completed,
        tracked,
        completion_rate: percentage(completed, tracked),
    }
}

/// Aggregate statistics across all cycles of a goal. The completion rate
/// pools daily records across cycles rather than averaging per-cycle rates,
/// so a short cycle does not weigh as much as a full one.
#[must_use]
pub fn goal_stats(cycles: &[Cycle]) -> GoalStats {
    let mut completed = 0;
    let mut tracked = 0;
    for cycle in cycles {
        let stats = cycle_stats(cycle);
        completed += stats.completed;
        tracked += stats.tracked;
    }
    let cycles_finished = cycles
        .iter()
        .filter(|c| c.status == CycleStatus::Finished)
        .count() as u32;

    GoalStats {
        total_cycles: cycles.len() as u32,
        cycles_finished,
        tracked_days: tracked,
        average_completion: percentage(completed, tracked),
    }
}

/// 1-indexed day number of `today` within a cycle starting at `cycle_start`.
#[must_use]
pub fn day_number(cycle_start: NaiveDate, today: NaiveDate) -> i64 {
    (today - cycle_start).num_days() + 1
}

/// Whether a cycle that started at `cycle_start` has run past its length.
#[must_use]
pub fn needs_renewal(cycle_start: NaiveDate, today: NaiveDate, cycle_days: u32) -> bool {
    day_number(cycle_start, today) > i64::from(cycle_days)
}

/// Whole-percent ratio, rounded half up. Zero denominator yields zero.
#[must_use]
pub const fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (part * 100 + whole / 2) / whole
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn yes(d: NaiveDate) -> VoteDay {
        VoteDay {
            date: d,
            yes: true,
            quantity: None,
        }
    }

    fn no(d: NaiveDate) -> VoteDay {
        VoteDay {
            date: d,
            yes: false,
            quantity: None,
        }
    }

    fn daily_yes(start: NaiveDate, days: u64) -> Vec<VoteDay> {
        (0..days)
            .map(|i| yes(start.checked_add_days(Days::new(i)).unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_votes_yield_no_cycles() {
        let today = date(2025, 6, 1);
        assert!(build_cycles(&[], today, 30).is_empty());
    }

    #[test]
    fn test_thirty_five_days_yield_two_cycles() {
        let start = date(2025, 1, 1);
        let votes = daily_yes(start, 35);
        let today = date(2025, 2, 4);

        let cycles = build_cycles(&votes, today, 30);
        assert_eq!(cycles.len(), 2);

        assert_eq!(cycles[0].cycle_number, 1);
        assert_eq!(cycles[0].daily_records.len(), 30);
        assert_eq!(cycles[0].end_date, Some(date(2025, 1, 30)));

        assert_eq!(cycles[1].cycle_number, 2);
        assert_eq!(cycles[1].daily_records.len(), 5);
        assert_eq!(cycles[1].start_date, date(2025, 1, 31));
        // Trailing partial window has no end date yet.
        assert_eq!(cycles[1].end_date, None);
    }

    #[test]
    fn test_trailing_cycle_is_active() {
        let start = date(2025, 1, 1);
        let votes = daily_yes(start, 35);
        let today = date(2025, 2, 4);

        let cycles = build_cycles(&votes, today, 30);
        assert_eq!(cycles[0].status, CycleStatus::Finished);
        assert_eq!(cycles[1].status, CycleStatus::Active);
    }

    #[test]
    fn test_old_cycle_is_finished_when_viewed_later() {
        let votes = daily_yes(date(2025, 1, 1), 10);
        let today = date(2025, 6, 1);

        let cycles = build_cycles(&votes, today, 30);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].status, CycleStatus::Finished);
    }

    #[test]
    fn test_voteless_window_emits_no_cycle() {
        // Votes on days 0..5 and 65..70: the middle window is empty.
        let mut votes = daily_yes(date(2025, 1, 1), 5);
        votes.extend(daily_yes(date(2025, 3, 7), 5));
        let today = date(2025, 3, 15);

        let cycles = build_cycles(&votes, today, 30);
        assert_eq!(cycles.len(), 2);
        // Numbering still skips nothing: the second emitted cycle is number 2.
        assert_eq!(cycles[1].cycle_number, 2);
        assert_eq!(cycles[1].start_date, date(2025, 3, 2));
    }

    #[test]
    fn test_no_votes_become_failed_records() {
        let votes = vec![yes(date(2025, 1, 1)), no(date(2025, 1, 2))];
        let cycles = build_cycles(&votes, date(2025, 1, 2), 30);

        assert_eq!(cycles.len(), 1);
        let records = &cycles[0].daily_records;
        assert_eq!(records[0].status, DayStatus::Completed);
        assert_eq!(records[1].status, DayStatus::Failed);
    }

    #[test]
    fn test_quantity_dropped_for_no_votes() {
        let votes = vec![
            VoteDay {
                date: date(2025, 1, 1),
                yes: true,
                quantity: Some(3),
            },
            VoteDay {
                date: date(2025, 1, 2),
                yes: false,
                quantity: Some(7),
            },
        ];
        let cycles = build_cycles(&votes, date(2025, 1, 2), 30);
        assert_eq!(cycles[0].daily_records[0].quantity, Some(3));
        assert_eq!(cycles[0].daily_records[1].quantity, None);
    }

    #[test]
    fn test_streak_empty_is_zero() {
        assert_eq!(current_streak(&[], date(2025, 6, 1)), 0);
    }

    #[test]
    fn test_streak_single_yes_today() {
        let today = date(2025, 6, 1);
        assert_eq!(current_streak(&[yes(today)], today), 1);
    }

    #[test]
    fn test_streak_single_yes_yesterday_still_counts() {
        let today = date(2025, 6, 1);
        assert_eq!(current_streak(&[yes(date(2025, 5, 31))], today), 1);
    }

    #[test]
    fn test_streak_two_day_old_vote_is_broken() {
        let today = date(2025, 6, 1);
        assert_eq!(current_streak(&[yes(date(2025, 5, 30))], today), 0);
    }

    #[test]
    fn test_streak_long_run() {
        let today = date(2025, 6, 10);
        let votes = daily_yes(date(2025, 6, 1), 10);
        assert_eq!(current_streak(&votes, today), 10);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let today = date(2025, 6, 10);
        let mut votes = daily_yes(date(2025, 6, 8), 3); // 8, 9, 10
        votes.push(yes(date(2025, 6, 5))); // gap at 6..7
        assert_eq!(current_streak(&votes, today), 3);
    }

    #[test]
    fn test_streak_stops_at_no_vote() {
        let today = date(2025, 6, 10);
        let votes = vec![
            yes(date(2025, 6, 10)),
            yes(date(2025, 6, 9)),
            no(date(2025, 6, 8)),
            yes(date(2025, 6, 7)),
        ];
        assert_eq!(current_streak(&votes, today), 2);
    }

    #[test]
    fn test_streak_no_vote_today_does_not_break_yesterdays_run() {
        let today = date(2025, 6, 10);
        let votes = daily_yes(date(2025, 6, 7), 3); // 7, 8, 9
        assert_eq!(current_streak(&votes, today), 3);
    }

    #[test]
    fn test_board_masks_future_days() {
        let start = date(2025, 6, 1);
        let today = date(2025, 6, 3);
        let votes = vec![yes(date(2025, 6, 1)), no(date(2025, 6, 2))];

        let board = vote_board(start, &votes, today, 30);
        assert_eq!(board.len(), 30);
        assert_eq!(board[0].mark, BoardMark::Yes);
        assert_eq!(board[1].mark, BoardMark::No);
        assert_eq!(board[2].mark, BoardMark::None); // today, unvoted
        assert!(board[3..].iter().all(|d| d.mark == BoardMark::None));
    }

    #[test]
    fn test_cycle_stats_rounding() {
        let votes = vec![
            yes(date(2025, 1, 1)),
            yes(date(2025, 1, 2)),
            no(date(2025, 1, 3)),
        ];
        let cycles = build_cycles(&votes, date(2025, 1, 3), 30);
        let stats = cycle_stats(&cycles[0]);

        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.tracked, 3);
        assert_eq!(stats.completion_rate, 67); // 2/3 rounds up
    }

    #[test]
    fn test_skipped_days_excluded_from_rate() {
        // Two yes votes ten days apart: rate is 100, not 2/11.
        let votes = vec![yes(date(2025, 1, 1)), yes(date(2025, 1, 11))];
        let cycles = build_cycles(&votes, date(2025, 1, 11), 30);
        let stats = cycle_stats(&cycles[0]);

        assert_eq!(stats.tracked, 2);
        assert_eq!(stats.completion_rate, 100);
    }

    #[test]
    fn test_goal_stats_aggregation() {
        let votes = daily_yes(date(2025, 1, 1), 35);
        let today = date(2025, 2, 4);
        let cycles = build_cycles(&votes, today, 30);

        let stats = goal_stats(&cycles);
        assert_eq!(stats.total_cycles, 2);
        assert_eq!(stats.cycles_finished, 1);
        assert_eq!(stats.tracked_days, 35);
        assert_eq!(stats.average_completion, 100);
    }

    #[test]
    fn test_goal_stats_pool_records_across_cycles() {
        // Ten yes days in cycle 1, one no day in cycle 2: 10/11 pooled,
        // not the 50 an average of per-cycle rates would give.
        let mut votes = daily_yes(date(2025, 1, 1), 10);
        votes.push(no(date(2025, 2, 5)));
        let cycles = build_cycles(&votes, date(2025, 2, 5), 30);
        assert_eq!(cycles.len(), 2);

        let stats = goal_stats(&cycles);
        assert_eq!(stats.tracked_days, 11);
        assert_eq!(stats.average_completion, 91);
    }

    #[test]
    fn test_goal_stats_empty() {
        let stats = goal_stats(&[]);
        assert_eq!(stats.total_cycles, 0);
        assert_eq!(stats.average_completion, 0);
    }

    #[test]
    fn test_day_number_is_one_indexed() {
        let start = date(2025, 6, 1);
        assert_eq!(day_number(start, start), 1);
        assert_eq!(day_number(start, date(2025, 6, 30)), 30);
    }

    #[test]
    fn test_renewal_boundary() {
        let start = date(2025, 6, 1);
        // Day 30 is still inside the cycle; day 31 requires renewal.
        assert!(!needs_renewal(start, date(2025, 6, 30), 30));
        assert!(needs_renewal(start, date(2025, 7, 1), 30));
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 2), 50);
    }
}
