use serde::Deserialize;
use ts_rs::TS;

// 加入班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
pub struct JoinClassRequest {
    pub invite_code: String,
    pub profile_name: Option<String>,
}
