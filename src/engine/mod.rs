//! 哈希引擎模块
//!
//! 把 crypto 原语组装成完整的哈希：
//! - `state`: 256 位状态及其三种视图
//! - `round`: 两个版本共用的轮函数骨架与字节吸收
//! - `rambox`: 工作区分配、确定性初始化、查找/回写规则
//! - `rf256`: v1 入口（2 MiB，纯整数）
//! - `rfv2`: v2 入口（96 MiB，浮点扰动，两遍结构）

pub mod rambox;
pub mod rf256;
pub mod rfv2;
pub(crate) mod round;
pub(crate) mod state;

#[cfg(test)]
mod rambox_tests;
#[cfg(test)]
mod rf256_tests;
#[cfg(test)]
mod rfv2_tests;
#[cfg(test)]
mod round_tests;
