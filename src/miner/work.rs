//! 挖矿工作结构
//!
//! 挖矿框架给出的一份工作：80 字节区块头（76 字节常量前缀 + 4 字节
//! nonce），以 20 个 32 位字表示，线缆字节序为大端；外加 256 位难度
//! 目标。结构可序列化，便于与基于 JSON-RPC 的矿池协议对接。

use serde::{Deserialize, Serialize};

/// 一份挖矿工作
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Work {
    /// 区块头的 20 个 32 位字，`data[19]` 是 nonce
    pub data: [u32; 20],
    /// 256 位难度目标（小端字序，`target[7]` 为最高位字）
    pub target: [u32; 8],
}

impl Work {
    /// 把区块头常量部分（前 19 个字）按大端编码成 76 字节
    pub fn header_prefix(&self) -> [u8; 76] {
        let mut prefix = [0u8; 76];
        for (chunk, word) in prefix.chunks_exact_mut(4).zip(self.data[..19].iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        prefix
    }

    /// 目标的最高 32 位字，用于廉价的首轮筛选
    pub fn htarg(&self) -> u32 {
        self.target[7]
    }
}

/// 把 32 字节摘要看成 8 个 32 位小端字
pub fn hash_words(hash: &[u8; 32]) -> [u32; 8] {
    let mut words = [0u32; 8];
    for (word, chunk) in words.iter_mut().zip(hash.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// 完整的 256 位目标比较：从最高位字往下逐字比较 `hash <= target`
pub fn fulltest(hash: &[u32; 8], target: &[u32; 8]) -> bool {
    for i in (0..8).rev() {
        if hash[i] > target[i] {
            return false;
        }
        if hash[i] < target[i] {
            return true;
        }
    }
    true
}
