//! Post-hoc summary metrics from the outcome log.

use std::fmt;

use super::engine::{IncidentOutcome, Outcome};

/// Aggregate metrics derived from a complete run.
///
/// Computed post-hoc from the outcome log to keep per-incident data and
/// reported totals consistent.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub total_incidents: usize,
    pub served: usize,
    pub failed: usize,
    /// Fraction of incidents served, 0.0 to 1.0.
    pub success_rate: f64,
    /// Points earned minus failure penalties.
    pub total_points: f64,
    /// Total travel distance, outbound and return legs.
    pub total_travel_distance: f64,
    /// `total_points - total_travel_distance`.
    pub net_score: f64,
    /// Mean outbound travel time over served incidents, seconds.
    pub avg_response_time_s: f64,
    /// Mean slack before the deadline over served incidents, seconds.
    pub avg_slack_s: f64,
}

impl SummaryReport {
    /// Computes all metrics from the outcome log.
    pub fn from_outcomes(outcomes: &[IncidentOutcome]) -> Self {
        let mut served = 0_usize;
        let mut failed = 0_usize;
        let mut points = 0.0_f64;
        let mut distance = 0.0_f64;
        let mut response_sum = 0.0_f64;
        let mut slack_sum = 0.0_f64;

        for outcome in outcomes {
            match outcome.outcome {
                Outcome::Served {
                    travel_time,
                    travel_distance,
                    slack_s,
                    points: p,
                    ..
                } => {
                    served += 1;
                    points += p;
                    distance += travel_distance;
                    response_sum += travel_time;
                    slack_sum += slack_s;
                }
                Outcome::Failed { penalty } => {
                    failed += 1;
                    points += penalty;
                }
            }
        }

        let total = outcomes.len();
        let success_rate = if total > 0 {
            served as f64 / total as f64
        } else {
            0.0
        };
        let (avg_response_time_s, avg_slack_s) = if served > 0 {
            (response_sum / served as f64, slack_sum / served as f64)
        } else {
            (0.0, 0.0)
        };

        Self {
            total_incidents: total,
            served,
            failed,
            success_rate,
            total_points: points,
            total_travel_distance: distance,
            net_score: points - distance,
            avg_response_time_s,
            avg_slack_s,
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Incidents:          {}", self.total_incidents)?;
        writeln!(
            f,
            "Served / failed:    {} / {} ({:.1}% success)",
            self.served,
            self.failed,
            self.success_rate * 100.0
        )?;
        writeln!(f, "Points:             {:.2}", self.total_points)?;
        writeln!(f, "Travel distance:    {:.2}", self.total_travel_distance)?;
        writeln!(f, "Net score:          {:.2}", self.net_score)?;
        writeln!(f, "Avg response time:  {:.1} s", self.avg_response_time_s)?;
        write!(f, "Avg slack:          {:.1} s", self.avg_slack_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IncidentKind;

    fn served(points: f64, distance: f64, travel_time: f64, slack: f64) -> IncidentOutcome {
        IncidentOutcome {
            incident_id: 0,
            kind: IncidentKind::Fire,
            time: 0.0,
            outcome: Outcome::Served {
                unit_id: 0,
                arrival_at_scene: travel_time,
                travel_time,
                travel_distance: distance,
                slack_s: slack,
                points,
            },
        }
    }

    fn failed(penalty: f64) -> IncidentOutcome {
        IncidentOutcome {
            incident_id: 1,
            kind: IncidentKind::Police,
            time: 0.0,
            outcome: Outcome::Failed { penalty },
        }
    }

    #[test]
    fn totals_and_averages() {
        let outcomes = vec![
            served(2.0, 100.0, 30.0, 120.0),
            served(4.0, 60.0, 10.0, 240.0),
            failed(-2.0),
        ];
        let report = SummaryReport::from_outcomes(&outcomes);
        assert_eq!(report.total_incidents, 3);
        assert_eq!(report.served, 2);
        assert_eq!(report.failed, 1);
        assert!((report.total_points - 4.0).abs() < 1e-9);
        assert_eq!(report.total_travel_distance, 160.0);
        assert!((report.net_score + 156.0).abs() < 1e-9);
        assert_eq!(report.avg_response_time_s, 20.0);
        assert_eq!(report.avg_slack_s, 180.0);
    }

    #[test]
    fn empty_log_yields_zeroes() {
        let report = SummaryReport::from_outcomes(&[]);
        assert_eq!(report.total_incidents, 0);
        assert_eq!(report.success_rate, 0.0);
        assert_eq!(report.avg_response_time_s, 0.0);
    }

    #[test]
    fn display_does_not_panic() {
        let report = SummaryReport::from_outcomes(&[served(1.0, 50.0, 25.0, 60.0)]);
        assert!(!format!("{report}").is_empty());
    }
}
