//! 期末成绩等级

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 等级，下界归属于较高的等级（8.5 为 Excellent，8.49 为 Good）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeTier {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
    NotClassified,
}

impl GradeTier {
    pub const ALL: [GradeTier; 6] = [
        GradeTier::Excellent,
        GradeTier::Good,
        GradeTier::Average,
        GradeTier::BelowAverage,
        GradeTier::Poor,
        GradeTier::NotClassified,
    ];

    pub fn classify(final_grade: Option<f64>) -> Self {
        match final_grade {
            None => GradeTier::NotClassified,
            Some(g) if g >= 8.5 => GradeTier::Excellent,
            Some(g) if g >= 7.0 => GradeTier::Good,
            Some(g) if g >= 5.5 => GradeTier::Average,
            Some(g) if g >= 4.0 => GradeTier::BelowAverage,
            Some(_) => GradeTier::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradeTier::Excellent => "Excellent",
            GradeTier::Good => "Good",
            GradeTier::Average => "Average",
            GradeTier::BelowAverage => "Below Average",
            GradeTier::Poor => "Poor",
            GradeTier::NotClassified => "Not classified",
        }
    }
}

impl std::fmt::Display for GradeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(GradeTier::classify(Some(10.0)), GradeTier::Excellent);
        assert_eq!(GradeTier::classify(Some(8.5)), GradeTier::Excellent);
        assert_eq!(GradeTier::classify(Some(8.49)), GradeTier::Good);
        assert_eq!(GradeTier::classify(Some(7.0)), GradeTier::Good);
        assert_eq!(GradeTier::classify(Some(6.99)), GradeTier::Average);
        assert_eq!(GradeTier::classify(Some(5.5)), GradeTier::Average);
        assert_eq!(GradeTier::classify(Some(5.49)), GradeTier::BelowAverage);
        assert_eq!(GradeTier::classify(Some(4.0)), GradeTier::BelowAverage);
        assert_eq!(GradeTier::classify(Some(3.99)), GradeTier::Poor);
        assert_eq!(GradeTier::classify(Some(0.0)), GradeTier::Poor);
        assert_eq!(GradeTier::classify(None), GradeTier::NotClassified);
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(
            serde_json::to_string(&GradeTier::BelowAverage).unwrap(),
            "\"below_average\""
        );
        assert_eq!(
            serde_json::from_str::<GradeTier>("\"not_classified\"").unwrap(),
            GradeTier::NotClassified
        );
    }
}
