use serde::Deserialize;
use ts_rs::TS;

/// 登录请求，`username` 字段也接受邮箱
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// 去掉首尾空白后的用户名或邮箱
    pub fn identifier(&self) -> &str {
        self.username.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_accepts_email_field() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email": " minsu@hanlms.kr ", "password": "Secret123"}"#)
                .unwrap();
        assert_eq!(request.identifier(), "minsu@hanlms.kr");
    }
}
