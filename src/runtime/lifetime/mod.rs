//! 服务启动与关闭

pub mod shutdown;
pub mod startup;
