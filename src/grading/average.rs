//! 同类成绩求平均

use super::round_one_decimal;

/// 算术平均，保留一位小数；空列表返回 `None` 而不是 0
pub fn average_scores(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().sum();
    Some(round_one_decimal(sum / scores.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bucket_is_undefined() {
        assert_eq!(average_scores(&[]), None);
    }

    #[test]
    fn test_average_rounded() {
        assert_eq!(average_scores(&[8.0, 6.0]), Some(7.0));
        assert_eq!(average_scores(&[10.0, 6.5, 7.0]), Some(7.8));
        assert_eq!(average_scores(&[0.0]), Some(0.0));
    }
}
