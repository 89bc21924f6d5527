//! nonce 扫描
//!
//! 扫描循环把区块头末 4 字节逐个换成大端 nonce，先用消息 CRC 的
//! 正弦过滤廉价地丢弃绝大多数候选（只有 `sin_scaled(msgh) == 2`
//! 的 nonce 才被协议接受），通过的才计算完整哈希并与目标比较。
//! 停止标志在两次尝试之间以 Relaxed 读取轮询，只要求最终可见。

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::crypto::crc32::crc32_mem;
use crate::crypto::fpmath::sin_scaled;
use crate::engine::rambox::{RamBox, RamBoxError};
use crate::engine::rfv2::{RFV2_INIT_CRC, rfv2_hash};
use crate::miner::work::{Work, fulltest, hash_words};

/// 一次扫描的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// 命中：该 nonce 的哈希不超过目标
    Found { nonce: u32, hash: [u8; 32] },
    /// 区间内没有命中；`scanned` 是尝试过的 nonce 数
    Exhausted { scanned: u64 },
}

/// 在 `[nonces.start, nonces.end)` 上扫描一个 80 字节区块头
///
/// # 参数
///
/// * `header` - 80 字节区块头，前 76 字节为常量
/// * `rambox` - 工作线程私有的工作区
/// * `template` - 可选模板，用于记录饱和时的快速恢复
/// * `target` - 与摘要最高 32 位字比较的目标
/// * `nonces` - 待扫描的 nonce 区间
/// * `stop` - 调用方持有的停止标志
pub fn scan_hdr(
    header: &[u8; 80],
    rambox: &mut RamBox,
    template: Option<&RamBox>,
    target: u32,
    nonces: Range<u32>,
    stop: &AtomicBool,
) -> Result<ScanOutcome, RamBoxError> {
    let msgh_init = crc32_mem(RFV2_INIT_CRC, &header[..76]);
    let mut hdr = *header;
    let mut scanned = 0u64;
    let mut nonce = nonces.start;

    while nonce < nonces.end && !stop.load(Ordering::Relaxed) {
        hdr[76..80].copy_from_slice(&nonce.to_be_bytes());
        scanned += 1;

        let msgh = crc32_mem(msgh_init, &hdr[76..80]);
        if sin_scaled(msgh) == 2 {
            let hash = rfv2_hash(&hdr, Some(rambox), template)?;
            let top = u32::from_le_bytes([hash[28], hash[29], hash[30], hash[31]]);
            if top <= target {
                return Ok(ScanOutcome::Found { nonce, hash });
            }
        }
        nonce += 1;
    }
    Ok(ScanOutcome::Exhausted { scanned })
}

/// 挖矿框架入口：在一份工作上从当前 nonce 扫到 `max_nonce`
///
/// 命中时把 nonce 写回 `work.data[19]` 并返回 `Ok(true)`；
/// 扫完区间或被 `restart` 打断时写回最后的 nonce 并返回 `Ok(false)`。
/// `hashes_done` 报告本次推进的 nonce 数。
pub fn scanhash_rfv2(
    work: &mut Work,
    rambox: &mut RamBox,
    template: Option<&RamBox>,
    max_nonce: u32,
    hashes_done: &mut u64,
    restart: &AtomicBool,
) -> Result<bool, RamBoxError> {
    let mut header = [0u8; 80];
    header[..76].copy_from_slice(&work.header_prefix());

    let htarg = work.htarg();
    let first_nonce = work.data[19];
    let mut nonce = first_nonce;
    let msgh_init = crc32_mem(RFV2_INIT_CRC, &header[..76]);

    loop {
        header[76..80].copy_from_slice(&nonce.to_be_bytes());

        let msgh = crc32_mem(msgh_init, &header[76..80]);
        if sin_scaled(msgh) == 2 {
            let hash = rfv2_hash(&header, Some(rambox), template)?;
            let words = hash_words(&hash);
            if words[7] <= htarg && fulltest(&words, &work.target) {
                work.data[19] = nonce;
                *hashes_done = nonce.wrapping_sub(first_nonce) as u64;
                return Ok(true);
            }
        }

        nonce = nonce.wrapping_add(1);
        if nonce >= max_nonce || restart.load(Ordering::Relaxed) {
            break;
        }
    }

    work.data[19] = nonce;
    *hashes_done = nonce.wrapping_sub(first_nonce) as u64 + 1;
    Ok(false)
}
