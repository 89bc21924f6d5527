//! RainForest CPU 友好型工作量证明哈希库
//!
//! 该库实现 RainForest 哈希算法的两个版本：
//! 1. rf256（v1）：2 MiB 工作区，纯整数运算
//! 2. rfv2（v2）：96 MiB 工作区，增加 IEEE-754 浮点扰动和两遍外层结构
//!
//! 算法偏向通用 64 位 CPU：大量使用 64 位整数运算、循环移位、字节交换、
//! CRC32 与 AES 轮函数，并通过大块散列驱动的查找表（rambox）占用
//! L1 缓存与内存带宽，从而压制 GPU / FPGA / ASIC 的优势。
//!
//! # 模块结构
//!
//! - `crypto`: 常量表、CRC32、两轮 AES、浮点扰动、硬件加速抽象
//! - `engine`: 256 位状态、轮函数、rambox、两个版本的哈希入口
//! - `miner`: 挖矿框架集成（工作结构、nonce 扫描）
//!
//! # 使用示例
//!
//! ```rust
//! use rainforest::{rf256_hash, rfv2_hash, RamBox};
//!
//! // v1：一次性哈希（内部分配并初始化 2 MiB 工作区）
//! let digest = rf256_hash(b"abc").unwrap();
//! assert_eq!(digest.len(), 32);
//!
//! // v2：调用方持有 96 MiB 工作区，可跨多次哈希复用
//! let mut rambox = RamBox::for_rfv2().unwrap();
//! let digest = rfv2_hash(b"abc", Some(&mut rambox), None).unwrap();
//! assert_eq!(digest.len(), 32);
//! ```

pub mod crypto;
pub mod engine;
pub mod miner;

pub use crypto::fpmath::{CHECK_SIN_SUM1, CHECK_SIN_SUM5, check_sin, sin_scaled};
pub use engine::rambox::{
    RF256_RAMBOX_SIZE, RFV2_RAMBOX_HIST, RFV2_RAMBOX_SIZE, RamBox, RamBoxError,
};
pub use engine::rf256::{RF256_INIT_CRC, Rf256Ctx, rf256_hash, rf256_hash2};
pub use engine::rfv2::{
    RFV2_INIT_CRC, rfv2_hash, rfv2_hash2, rfv2_hash_shared, rfv2_raminit,
};
