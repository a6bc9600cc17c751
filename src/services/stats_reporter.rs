//! 耗时统计 - 业务能力层

use crate::models::task::TaskTiming;
use tracing::info;

/// 单个任务的统计条目
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub task_id: String,
    pub duration_secs: f64,
    /// 占全部任务总耗时的百分比
    pub percent: f64,
}

/// 批次耗时报告
#[derive(Debug, Clone, PartialEq)]
pub struct TimingReport {
    pub entries: Vec<ReportEntry>,
    pub total_secs: f64,
    /// 平均耗时，无任务时为 `None`
    pub mean_secs: Option<f64>,
}

impl TimingReport {
    /// 根据耗时记录生成报告
    pub fn from_timings(timings: &[TaskTiming]) -> Self {
        let total_secs: f64 = timings.iter().map(|t| t.duration_secs).sum();

        let entries = timings
            .iter()
            .map(|t| ReportEntry {
                task_id: t.task_id.clone(),
                duration_secs: t.duration_secs,
                percent: if total_secs > 0.0 {
                    t.duration_secs / total_secs * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        let mean_secs = (!timings.is_empty()).then(|| total_secs / timings.len() as f64);

        Self {
            entries,
            total_secs,
            mean_secs,
        }
    }

    /// 输出报告
    pub fn log(&self) {
        info!("\n{}", "=".repeat(60));
        info!("📊 执行耗时统计");
        info!("{}", "=".repeat(60));
        for entry in &self.entries {
            info!(
                "任务 {}: {:.2}s ({:.1}%)",
                entry.task_id, entry.duration_secs, entry.percent
            );
        }
        info!("\n总耗时: {:.2} 秒", self.total_secs);
        if let Some(mean) = self.mean_secs {
            info!("平均每个任务: {:.2}s", mean);
        }
        info!("{}", "=".repeat(60));
    }
}

/// 生成并输出报告
pub fn report(timings: &[TaskTiming]) -> TimingReport {
    let report = TimingReport::from_timings(timings);
    report.log();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(id: &str, secs: f64) -> TaskTiming {
        TaskTiming {
            task_id: id.to_string(),
            duration_secs: secs,
        }
    }

    #[test]
    fn test_report_empty() {
        let report = report(&[]);
        assert!(report.entries.is_empty());
        assert_eq!(report.total_secs, 0.0);
        assert_eq!(report.mean_secs, None);
    }

    #[test]
    fn test_report_single_is_full() {
        let report = TimingReport::from_timings(&[timing("t1", 2.5)]);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].percent, 100.0);
        assert_eq!(report.total_secs, 2.5);
        assert_eq!(report.mean_secs, Some(2.5));
    }

    #[test]
    fn test_report_breakdown() {
        let report = TimingReport::from_timings(&[timing("a", 1.0), timing("b", 3.0)]);
        assert_eq!(report.entries[0].percent, 25.0);
        assert_eq!(report.entries[1].percent, 75.0);
        assert_eq!(report.total_secs, 4.0);
        assert_eq!(report.mean_secs, Some(2.0));
    }

    #[test]
    fn test_report_zero_durations() {
        let report = TimingReport::from_timings(&[timing("a", 0.0), timing("b", 0.0)]);
        assert!(report.entries.iter().all(|e| e.percent == 0.0));
        assert_eq!(report.mean_secs, Some(0.0));
    }
}
