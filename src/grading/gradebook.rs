//! 班级成绩册 → 学生成绩汇总
//!
//! 成绩册由存储层一次性读出：考试、考试成绩、作业、已批改的提交。
//! 指向已不存在的考试/作业的成绩记录会被跳过。

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::{GradeSummary, GradeWeights, ScoreEntry, compute_student_summary};

/// 一次考试或一项作业
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeItem {
    pub id: i64,
    pub max_score: f64,
}

/// 学生在某个考试/作业上的原始得分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    pub item_id: i64,
    pub student_id: i64,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Gradebook {
    pub exams: Vec<GradeItem>,
    pub exam_scores: Vec<ScoreRecord>,
    pub assignments: Vec<GradeItem>,
    pub assignment_scores: Vec<ScoreRecord>,
}

impl Gradebook {
    /// 单个学生的成绩汇总
    pub fn summarize(&self, student_id: i64, weights: &GradeWeights) -> GradeSummary {
        self.summarize_many(&[student_id], weights)
            .pop()
            .unwrap_or_else(|| compute_student_summary(&[], &[], weights))
    }

    /// 按给定顺序计算多个学生的成绩汇总
    pub fn summarize_many(&self, student_ids: &[i64], weights: &GradeWeights) -> Vec<GradeSummary> {
        let exam_index = index_by_student(&self.exam_scores);
        let assignment_index = index_by_student(&self.assignment_scores);

        student_ids
            .iter()
            .map(|student_id| {
                let (tests, test_orphans) = collect_entries(
                    &self.exams,
                    exam_index.get(student_id).map(Vec::as_slice).unwrap_or(&[]),
                );
                let (assignments, assignment_orphans) = collect_entries(
                    &self.assignments,
                    assignment_index
                        .get(student_id)
                        .map(Vec::as_slice)
                        .unwrap_or(&[]),
                );

                let orphans = test_orphans + assignment_orphans;
                if orphans > 0 {
                    warn!(
                        "Student {} has {} score record(s) referencing missing exams or assignments",
                        student_id, orphans
                    );
                }

                let mut summary = compute_student_summary(&tests, &assignments, weights);
                summary.skipped_entries += orphans;
                summary
            })
            .collect()
    }
}

fn index_by_student(records: &[ScoreRecord]) -> HashMap<i64, Vec<&ScoreRecord>> {
    let mut index: HashMap<i64, Vec<&ScoreRecord>> = HashMap::new();
    for record in records {
        index.entry(record.student_id).or_default().push(record);
    }
    index
}

/// 按考试/作业顺序取出学生的成绩，返回 (成绩, 失效引用数)
///
/// 同一项目出现多条记录时只取第一条。
fn collect_entries(items: &[GradeItem], records: &[&ScoreRecord]) -> (Vec<ScoreEntry>, usize) {
    let known: HashSet<i64> = items.iter().map(|item| item.id).collect();
    let mut by_item: HashMap<i64, f64> = HashMap::new();
    let mut orphans = 0;

    for record in records {
        if !known.contains(&record.item_id) {
            orphans += 1;
            continue;
        }
        by_item.entry(record.item_id).or_insert(record.score);
    }

    let entries = items
        .iter()
        .filter_map(|item| {
            by_item
                .get(&item.id)
                .map(|score| ScoreEntry::new(*score, item.max_score))
        })
        .collect();

    (entries, orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{GradeTier, compute_class_rollup};

    fn item(id: i64, max_score: f64) -> GradeItem {
        GradeItem { id, max_score }
    }

    fn record(item_id: i64, student_id: i64, score: f64) -> ScoreRecord {
        ScoreRecord {
            item_id,
            student_id,
            score,
        }
    }

    fn sample_gradebook() -> Gradebook {
        Gradebook {
            exams: vec![item(1, 100.0), item(2, 50.0)],
            exam_scores: vec![
                record(1, 10, 90.0),
                record(2, 10, 45.0),
                record(1, 11, 40.0),
                // 考试 99 已被删除
                record(99, 11, 100.0),
            ],
            assignments: vec![item(5, 10.0), item(6, 10.0)],
            assignment_scores: vec![record(5, 10, 5.0), record(6, 10, 5.0), record(5, 12, 8.0)],
        }
    }

    #[test]
    fn test_summarize_weighted_student() {
        let book = sample_gradebook();
        let summary = book.summarize(10, &GradeWeights::default());
        assert_eq!(summary.test_scores, vec![9.0, 9.0]);
        assert_eq!(summary.test_average, Some(9.0));
        assert_eq!(summary.assignment_average, Some(5.0));
        assert_eq!(summary.final_grade, Some(7.4));
        assert_eq!(summary.tier, GradeTier::Good);
        assert_eq!(summary.skipped_entries, 0);
    }

    #[test]
    fn test_orphaned_records_are_skipped() {
        let book = sample_gradebook();
        let summary = book.summarize(11, &GradeWeights::default());
        assert_eq!(summary.test_scores, vec![4.0]);
        assert_eq!(summary.final_grade, Some(4.0));
        assert_eq!(summary.tier, GradeTier::BelowAverage);
        assert_eq!(summary.skipped_entries, 1);
    }

    #[test]
    fn test_student_without_records() {
        let book = sample_gradebook();
        let summary = book.summarize(404, &GradeWeights::default());
        assert_eq!(summary.final_grade, None);
        assert_eq!(summary.tier, GradeTier::NotClassified);
    }

    #[test]
    fn test_duplicate_records_keep_first() {
        let book = Gradebook {
            exams: vec![item(1, 10.0)],
            exam_scores: vec![record(1, 10, 6.0), record(1, 10, 10.0)],
            ..Default::default()
        };
        let summary = book.summarize(10, &GradeWeights::default());
        assert_eq!(summary.test_scores, vec![6.0]);
    }

    #[test]
    fn test_summarize_many_feeds_rollup() {
        let book = sample_gradebook();
        let summaries = book.summarize_many(&[10, 11, 12, 13], &GradeWeights::default());
        assert_eq!(summaries.len(), 4);

        let rollup = compute_class_rollup(&summaries);
        // 7.4、4.0、8.0，第 13 号学生没有任何成绩
        assert_eq!(rollup.class_average, Some(6.5));
        assert_eq!(rollup.graded_students, 3);
        assert_eq!(rollup.count(GradeTier::Good), 2);
        assert_eq!(rollup.count(GradeTier::BelowAverage), 1);
        assert_eq!(rollup.count(GradeTier::NotClassified), 1);
    }
}
