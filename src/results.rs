use serde::Serialize;

use crate::providers::circleci::types::JobInfo;

/// One benchmark job paired with the URL of its log artifact.
///
/// `output_url` is `None` when the legacy API exposed no matching log
/// action for the job; downstream consumers must check before fetching.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub job_info: JobInfo,
    pub output_url: Option<String>,
}

impl BenchmarkResult {
    /// Numeric sort key derived from the job's start time.
    ///
    /// Jobs that never started sort before everything else, giving a total
    /// order without aborting the run.
    fn sort_key(&self) -> i64 {
        self.job_info
            .started_at
            .map_or(i64::MIN, |t| t.timestamp_millis())
    }
}

/// Order results by start time, ascending. The sort is stable, so results
/// with equal start times keep their discovery order.
pub fn sort_by_start_time(results: &mut [BenchmarkResult]) {
    results.sort_by_key(BenchmarkResult::sort_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn result(job_number: u64, started_at: Option<&str>) -> BenchmarkResult {
        BenchmarkResult {
            job_info: JobInfo {
                job_number,
                started_at: started_at
                    .map(|s| s.parse::<DateTime<Utc>>().unwrap()),
            },
            output_url: Some(format!("https://logs/{job_number}")),
        }
    }

    #[test]
    fn test_sort_by_start_time_ascending() {
        let mut results = vec![
            result(1, Some("2023-01-02T00:00:00Z")),
            result(2, Some("2023-01-01T00:00:00Z")),
            result(3, Some("2023-01-03T00:00:00Z")),
        ];

        sort_by_start_time(&mut results);

        let order: Vec<u64> = results.iter().map(|r| r.job_info.job_number).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut results = vec![
            result(10, Some("2023-01-01T00:00:00Z")),
            result(11, Some("2023-01-01T00:00:00Z")),
            result(12, Some("2023-01-01T00:00:00Z")),
        ];

        sort_by_start_time(&mut results);

        let order: Vec<u64> = results.iter().map(|r| r.job_info.job_number).collect();
        assert_eq!(order, vec![10, 11, 12]);
    }

    #[test]
    fn test_unstarted_jobs_sort_first() {
        let mut results = vec![
            result(1, Some("2023-01-01T00:00:00Z")),
            result(2, None),
        ];

        sort_by_start_time(&mut results);

        assert_eq!(results[0].job_info.job_number, 2);
    }
}
