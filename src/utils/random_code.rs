use rand::{Rng, distr::Alphanumeric};

/// 生成指定长度的字母数字随机码（班级邀请码、初始管理员密码）
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_shape() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(crate::utils::validate::validate_invite_code(&code).is_ok());
    }
}
