//! Crypto 原语模块
//!
//! 提供哈希核心依赖的全部纯计算原语：
//! - 常量查找表与初始向量
//! - IEEE 802.3 反射 CRC32（1/2/3/4/8 字节步进）
//! - 两轮 AES-128 非线性混合器
//! - IEEE-754 浮点扰动与合规性自检
//! - CPU 特性加速器抽象（启动时一次性选择）
//!
//! # 模块结构
//!
//! - `tables`: rf_table 查找表与 256 位初始向量
//! - `crc32`: CRC32 原语
//! - `aes2r`: 两轮 AES-128
//! - `fpmath`: 浮点扰动
//! - `accel`: 硬件加速抽象

pub mod accel;
pub mod aes2r;
pub mod crc32;
pub mod fpmath;
pub mod tables;

#[cfg(test)]
mod fpmath_tests;
