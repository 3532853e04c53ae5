//! 班级成绩汇总

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{GradeSummary, GradeTier, round_one_decimal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ClassRollup {
    /// 仅统计有期末成绩的学生
    pub class_average: Option<f64>,
    /// 每个等级的人数，包含 0 人的等级
    pub tier_counts: BTreeMap<GradeTier, usize>,
    pub graded_students: usize,
    pub total_students: usize,
}

impl ClassRollup {
    pub fn count(&self, tier: GradeTier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }
}

/// 汇总班级成绩
///
/// 没有期末成绩的学生既不计入分子也不计入分母，但会计入 `NotClassified`。
pub fn compute_class_rollup<'a, I>(summaries: I) -> ClassRollup
where
    I: IntoIterator<Item = &'a GradeSummary>,
{
    let mut tier_counts: BTreeMap<GradeTier, usize> =
        GradeTier::ALL.iter().map(|tier| (*tier, 0)).collect();
    let mut sum = 0.0;
    let mut graded_students = 0;
    let mut total_students = 0;

    for summary in summaries {
        total_students += 1;
        *tier_counts.entry(summary.tier).or_insert(0) += 1;
        if let Some(grade) = summary.final_grade {
            sum += grade;
            graded_students += 1;
        }
    }

    let class_average = if graded_students > 0 {
        Some(round_one_decimal(sum / graded_students as f64))
    } else {
        None
    };

    ClassRollup {
        class_average,
        tier_counts,
        graded_students,
        total_students,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with_final(final_grade: Option<f64>) -> GradeSummary {
        GradeSummary {
            test_scores: vec![],
            assignment_scores: vec![],
            test_average: final_grade,
            assignment_average: None,
            final_grade,
            tier: GradeTier::classify(final_grade),
            skipped_entries: 0,
        }
    }

    #[test]
    fn test_rollup_excludes_undefined_finals_from_average() {
        let summaries = vec![
            summary_with_final(Some(9.0)),
            summary_with_final(None),
            summary_with_final(Some(5.0)),
        ];
        let rollup = compute_class_rollup(&summaries);

        // 5.0 按分档表归入 BelowAverage（4.0 – 5.49），不是 Average
        assert_eq!(rollup.class_average, Some(7.0));
        assert_eq!(rollup.graded_students, 2);
        assert_eq!(rollup.total_students, 3);
        assert_eq!(rollup.count(GradeTier::Excellent), 1);
        assert_eq!(rollup.count(GradeTier::BelowAverage), 1);
        assert_eq!(rollup.count(GradeTier::NotClassified), 1);
        assert_eq!(rollup.count(GradeTier::Good), 0);
        assert_eq!(rollup.tier_counts.len(), GradeTier::ALL.len());
    }

    #[test]
    fn test_rollup_of_empty_class() {
        let rollup = compute_class_rollup(&Vec::new());
        assert_eq!(rollup.class_average, None);
        assert_eq!(rollup.total_students, 0);
        assert!(rollup.tier_counts.values().all(|count| *count == 0));
    }

    #[test]
    fn test_rollup_with_no_finals() {
        let summaries = vec![summary_with_final(None), summary_with_final(None)];
        let rollup = compute_class_rollup(&summaries);
        assert_eq!(rollup.class_average, None);
        assert_eq!(rollup.count(GradeTier::NotClassified), 2);
    }
}
