//! 挖矿框架集成
//!
//! 哈希核心之上的集成面：工作结构的字节序编解码、目标比较，以及
//! 带快速过滤的 nonce 扫描循环。并行策略属于调用方：每个工作线程
//! 持有自己的上下文与（可写的）rambox。

pub mod scan;
pub mod work;

#[cfg(test)]
mod work_tests;
