//! 期末成绩加权计算

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::round_one_decimal;
use crate::errors::{LmsError, Result};

const WEIGHT_EPSILON: f64 = 1e-6;

/// 考试 / 作业权重
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeWeights {
    pub test: f64,
    pub assignment: f64,
}

impl GradeWeights {
    /// 权重必须非负且之和为 1
    pub fn new(test: f64, assignment: f64) -> Result<Self> {
        if !test.is_finite() || !assignment.is_finite() || test < 0.0 || assignment < 0.0 {
            return Err(LmsError::validation(format!(
                "weights must be non-negative numbers, got test={test}, assignment={assignment}"
            )));
        }
        if (test + assignment - 1.0).abs() > WEIGHT_EPSILON {
            return Err(LmsError::validation(format!(
                "weights must sum to 1, got {}",
                test + assignment
            )));
        }
        Ok(Self { test, assignment })
    }
}

impl Default for GradeWeights {
    fn default() -> Self {
        Self {
            test: 0.6,
            assignment: 0.4,
        }
    }
}

/// 期末成绩
///
/// - 两项都有：按权重加权
/// - 只有一项：直接取该项
/// - 都没有：`None`
pub fn final_grade(
    test_average: Option<f64>,
    assignment_average: Option<f64>,
    weights: &GradeWeights,
) -> Option<f64> {
    let value = match (test_average, assignment_average) {
        (Some(test), Some(assignment)) => test * weights.test + assignment * weights.assignment,
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => return None,
    };
    Some(round_one_decimal(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_validation() {
        assert!(GradeWeights::new(0.6, 0.4).is_ok());
        assert!(GradeWeights::new(0.5, 0.5).is_ok());
        assert!(GradeWeights::new(1.0, 0.0).is_ok());
        assert!(GradeWeights::new(0.6, 0.6).is_err());
        assert!(GradeWeights::new(-0.2, 1.2).is_err());
        assert!(GradeWeights::new(f64::NAN, 0.4).is_err());
    }

    #[test]
    fn test_both_components() {
        let w = GradeWeights::new(0.6, 0.4).unwrap();
        assert_eq!(final_grade(Some(9.0), Some(5.0), &w), Some(7.4));

        let even = GradeWeights::new(0.5, 0.5).unwrap();
        assert_eq!(final_grade(Some(9.0), Some(5.0), &even), Some(7.0));
    }

    #[test]
    fn test_single_component_takes_full_weight() {
        let w = GradeWeights::default();
        assert_eq!(final_grade(Some(6.3), None, &w), Some(6.3));
        assert_eq!(final_grade(None, Some(8.8), &w), Some(8.8));
    }

    #[test]
    fn test_no_component_is_undefined() {
        assert_eq!(final_grade(None, None, &GradeWeights::default()), None);
    }

    #[test]
    fn test_zero_average_is_still_present() {
        let w = GradeWeights::default();
        assert_eq!(final_grade(Some(0.0), Some(10.0), &w), Some(4.0));
    }
}
