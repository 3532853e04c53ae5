//! 分数换算：原始分 → 0–10 分制

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{LmsError, Result};

/// 满分制换算的目标上限
pub const SCALE: f64 = 10.0;

/// 一条原始分数记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ScoreEntry {
    pub raw: f64,
    pub max: f64,
}

impl ScoreEntry {
    pub fn new(raw: f64, max: f64) -> Self {
        Self { raw, max }
    }

    /// 换算到 0–10 分制
    pub fn normalized(&self) -> Result<f64> {
        normalize_score(self.raw, self.max)
    }
}

/// 校验一条原始分数是否可以换算
///
/// 写入考试成绩、批改作业前也使用这个校验。
pub fn validate_score(raw: f64, max: f64) -> Result<()> {
    if !max.is_finite() || max <= 0.0 {
        return Err(LmsError::invalid_score(format!(
            "max score must be a positive number, got {max}"
        )));
    }
    if !raw.is_finite() || raw < 0.0 {
        return Err(LmsError::invalid_score(format!(
            "score must be a non-negative number, got {raw}"
        )));
    }
    if raw > max {
        return Err(LmsError::invalid_score(format!(
            "score {raw} exceeds max score {max}"
        )));
    }
    Ok(())
}

/// `raw / max * 10`，非法输入返回 `InvalidScore`
pub fn normalize_score(raw: f64, max: f64) -> Result<f64> {
    validate_score(raw, max)?;
    Ok(raw * SCALE / max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_score(45.0, 50.0).unwrap(), 9.0);
        assert_eq!(normalize_score(0.0, 20.0).unwrap(), 0.0);
        assert_eq!(normalize_score(20.0, 20.0).unwrap(), 10.0);
    }

    #[test]
    fn test_normalized_range() {
        for max in [1.0, 7.0, 10.0, 33.0, 100.0] {
            let mut raw = 0.0;
            while raw <= max {
                let n = normalize_score(raw, max).unwrap();
                assert!((0.0..=SCALE).contains(&n), "{raw}/{max} -> {n}");
                raw += 0.5;
            }
        }
    }

    #[test]
    fn test_rejects_zero_or_negative_max() {
        assert_eq!(normalize_score(5.0, 0.0).unwrap_err().code(), "E011");
        assert!(normalize_score(5.0, -10.0).is_err());
        assert!(normalize_score(5.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_negative_or_excess_raw() {
        assert!(normalize_score(-0.5, 10.0).is_err());
        assert!(normalize_score(10.5, 10.0).is_err());
        assert!(normalize_score(f64::INFINITY, 10.0).is_err());
    }
}
