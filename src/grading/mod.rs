//! 成绩聚合与等级划分
//!
//! 纯计算模块，不访问数据库：
//! - `normalize`: 原始分 / 满分 换算到 0–10 分制
//! - `average`: 同类成绩（考试、作业）求平均
//! - `final_grade`: 考试与作业加权得到期末成绩
//! - `tier`: 期末成绩映射到等级
//! - `rollup`: 班级层面的平均分与等级分布
//! - `gradebook`: 从班级成绩册构建每个学生的成绩汇总
//!
//! "没有成绩" 一律用 `None` 表示，不会被当作 0 分参与计算。

pub mod average;
pub mod final_grade;
pub mod gradebook;
pub mod normalize;
pub mod rollup;
pub mod tier;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use average::average_scores;
pub use final_grade::{GradeWeights, final_grade};
pub use gradebook::{GradeItem, Gradebook, ScoreRecord};
pub use normalize::{ScoreEntry, normalize_score};
pub use rollup::{ClassRollup, compute_class_rollup};
pub use tier::GradeTier;

/// 保留一位小数
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 单个学生在单个班级内的成绩汇总
///
/// 每次读取时重新计算，不落库。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSummary {
    /// 各次考试换算后的分数（按考试顺序）
    pub test_scores: Vec<f64>,
    /// 各项作业换算后的分数（按作业顺序）
    pub assignment_scores: Vec<f64>,
    pub test_average: Option<f64>,
    pub assignment_average: Option<f64>,
    pub final_grade: Option<f64>,
    pub tier: GradeTier,
    /// 因分数非法或引用失效而被跳过的条目数
    pub skipped_entries: usize,
}

/// 计算单个学生的成绩汇总
///
/// 非法的分数条目（负分、满分非正、超出满分）会被跳过并记录日志，不会中断计算。
pub fn compute_student_summary(
    test_scores: &[ScoreEntry],
    assignment_scores: &[ScoreEntry],
    weights: &GradeWeights,
) -> GradeSummary {
    let mut skipped_entries = 0;
    let tests = normalize_bucket(test_scores, "test", &mut skipped_entries);
    let assignments = normalize_bucket(assignment_scores, "assignment", &mut skipped_entries);

    let test_average = average_scores(&tests);
    let assignment_average = average_scores(&assignments);
    let final_grade = final_grade(test_average, assignment_average, weights);

    GradeSummary {
        test_scores: tests,
        assignment_scores: assignments,
        test_average,
        assignment_average,
        final_grade,
        tier: GradeTier::classify(final_grade),
        skipped_entries,
    }
}

fn normalize_bucket(entries: &[ScoreEntry], bucket: &str, skipped: &mut usize) -> Vec<f64> {
    entries
        .iter()
        .filter_map(|entry| match entry.normalized() {
            Ok(score) => Some(score),
            Err(e) => {
                tracing::warn!("Skipping {} score entry {:?}: {}", bucket, entry, e);
                *skipped += 1;
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(raw: f64, max: f64) -> ScoreEntry {
        ScoreEntry { raw, max }
    }

    fn weights_60_40() -> GradeWeights {
        GradeWeights::new(0.6, 0.4).unwrap()
    }

    #[test]
    fn test_empty_inputs_are_not_classified() {
        let summary = compute_student_summary(&[], &[], &weights_60_40());
        assert_eq!(summary.test_average, None);
        assert_eq!(summary.assignment_average, None);
        assert_eq!(summary.final_grade, None);
        assert_eq!(summary.tier, GradeTier::NotClassified);
    }

    #[test]
    fn test_assignments_only_fall_back_to_assignment_average() {
        let summary = compute_student_summary(
            &[],
            &[entry(8.0, 10.0), entry(6.0, 10.0)],
            &weights_60_40(),
        );
        assert_eq!(summary.test_average, None);
        assert_eq!(summary.assignment_average, Some(7.0));
        assert_eq!(summary.final_grade, Some(7.0));
        assert_eq!(summary.tier, GradeTier::Good);
    }

    #[test]
    fn test_weighted_combination() {
        let summary = compute_student_summary(
            &[entry(90.0, 100.0)],
            &[entry(5.0, 10.0)],
            &weights_60_40(),
        );
        assert_eq!(summary.test_average, Some(9.0));
        assert_eq!(summary.assignment_average, Some(5.0));
        assert_eq!(summary.final_grade, Some(7.4));
        assert_eq!(summary.tier, GradeTier::Good);
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let summary = compute_student_summary(
            &[entry(-1.0, 10.0), entry(17.0, 20.0)],
            &[entry(5.0, 0.0)],
            &weights_60_40(),
        );
        assert_eq!(summary.skipped_entries, 2);
        assert_eq!(summary.test_scores, vec![8.5]);
        assert_eq!(summary.assignment_average, None);
        assert_eq!(summary.final_grade, Some(8.5));
        assert_eq!(summary.tier, GradeTier::Excellent);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let tests = [entry(13.0, 20.0), entry(41.0, 50.0)];
        let assignments = [entry(7.5, 10.0)];
        let first = compute_student_summary(&tests, &assignments, &weights_60_40());
        let second = compute_student_summary(&tests, &assignments, &weights_60_40());
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(7.44), 7.4);
        assert_eq!(round_one_decimal(7.45), 7.5);
        assert_eq!(round_one_decimal(6.666_666), 6.7);
    }
}
