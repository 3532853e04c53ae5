use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
pub enum ClassUserRole {
    Student,             // 学生
    ClassRepresentative, // 课代表
    Teacher,             // 教师
}

impl ClassUserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const CLASSREPRESENTATIVE: &'static str = "class_representative";

    /// 会被计入成绩册的角色（课代表同时也是学生）
    pub fn is_learner(&self) -> bool {
        matches!(
            self,
            ClassUserRole::Student | ClassUserRole::ClassRepresentative
        )
    }
}

impl<'de> Deserialize<'de> for ClassUserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            ClassUserRole::STUDENT => Ok(ClassUserRole::Student),
            ClassUserRole::CLASSREPRESENTATIVE => Ok(ClassUserRole::ClassRepresentative),
            ClassUserRole::TEACHER => Ok(ClassUserRole::Teacher),
            _ => Err(serde::de::Error::custom(format!(
                "无效的班级用户角色: '{s}'. 支持的角色: student, class_representative, teacher"
            ))),
        }
    }
}

impl std::fmt::Display for ClassUserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassUserRole::Student => write!(f, "student"),
            ClassUserRole::ClassRepresentative => write!(f, "class_representative"),
            ClassUserRole::Teacher => write!(f, "teacher"),
        }
    }
}

impl std::str::FromStr for ClassUserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(ClassUserRole::Student),
            "class_representative" => Ok(ClassUserRole::ClassRepresentative),
            "teacher" => Ok(ClassUserRole::Teacher),
            _ => Err(format!("Invalid class user role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
pub struct ClassUser {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub profile_name: Option<String>,
    pub role: ClassUserRole,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learner_roles() {
        assert!(ClassUserRole::Student.is_learner());
        assert!(ClassUserRole::ClassRepresentative.is_learner());
        assert!(!ClassUserRole::Teacher.is_learner());
    }

    #[test]
    fn test_class_user_role_parse() {
        assert_eq!(
            "class_representative".parse::<ClassUserRole>().unwrap(),
            ClassUserRole::ClassRepresentative
        );
        assert!("monitor".parse::<ClassUserRole>().is_err());
    }
}
