//! Rambox：哈希驱动的大块查找表
//!
//! rambox 是一大块 64 位字数组：确定性初始化后，哈希过程中以数据
//! 驱动的下标读取，并以约 50% 的概率回写。两个版本的差别：
//!
//! - rf256：2 MiB，每次查找 5 次迭代，高字节判定回写，整个数组可寻址
//! - rfv2：96 MiB，每次查找 4 次迭代，符号位判定回写，访问被限制在由
//!   消息 CRC 决定的连续窗口内，并记录回写以便哈希后把数组恢复原状
//!
//! 初始化是大小的纯函数：两次独立初始化必须得到逐字节相同的内容。

use thiserror::Error;

use crate::crypto::crc32::add64_crc32;

/// rf256 rambox 大小（64 位字数，2 MiB）
pub const RF256_RAMBOX_SIZE: usize = 2 * 1024 * 1024 / 8;
/// rf256 每次查找的迭代次数
pub(crate) const RF256_RAMBOX_LOOPS: usize = 5;
/// rfv2 rambox 大小（64 位字数，96 MiB）
pub const RFV2_RAMBOX_SIZE: usize = 96 * 1024 * 1024 / 8;
/// rfv2 每次查找的迭代次数
pub(crate) const RFV2_RAMBOX_LOOPS: usize = 4;
/// rfv2 回写记录的容量上限
pub const RFV2_RAMBOX_HIST: usize = 1536;

/// rambox 分配失败
#[derive(Debug, Error)]
pub enum RamBoxError {
    /// 申请工作区内存失败
    #[error("rambox allocation of {0} bytes failed")]
    Alloc(usize),
}

/// 调用方持有的 rambox 工作区
///
/// 工作区由调用方分配并在多次哈希间复用；上下文只在哈希调用期间
/// 借用它。rfv2 的哈希结束后会把借来的工作区恢复到调用前的内容。
pub struct RamBox {
    words: Vec<u64>,
}

impl RamBox {
    fn allocate(words: usize) -> Result<Vec<u64>, RamBoxError> {
        let mut area: Vec<u64> = Vec::new();
        area.try_reserve_exact(words)
            .map_err(|_| RamBoxError::Alloc(words * 8))?;
        area.resize(words, 0);
        Ok(area)
    }

    /// 分配并初始化 rf256 大小的工作区
    pub fn for_rf256() -> Result<Self, RamBoxError> {
        let mut words = Self::allocate(RF256_RAMBOX_SIZE)?;
        raminit(&mut words);
        Ok(RamBox { words })
    }

    /// 分配并初始化 rfv2 大小的工作区
    pub fn for_rfv2() -> Result<Self, RamBoxError> {
        let mut words = Self::allocate(RFV2_RAMBOX_SIZE)?;
        raminit(&mut words);
        Ok(RamBox { words })
    }

    /// 从模板复制出一个同样大小的工作区
    pub fn try_from_template(template: &RamBox) -> Result<Self, RamBoxError> {
        let mut words = Self::allocate(template.words.len())?;
        words.copy_from_slice(&template.words);
        Ok(RamBox { words })
    }

    /// 重新跑一遍确定性初始化
    pub fn reinit(&mut self) {
        raminit(&mut self.words);
    }

    /// 工作区长度（64 位字数）
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// 工作区是否为空
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.words
    }

    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.words
    }
}

/// 确定性初始化 rambox
///
/// 以 16 字为步长行走：两个 64 位寄存器交替地以对方的低 6 位旋转并
/// 加上 0x111..0x888 的滚动常数，每步写入（新值, 旧值）两个字。
/// 数据块在旋转的同时互相交换，每次只需要一次旋转和一次寄存器换名。
pub(crate) fn raminit(rambox: &mut [u64]) {
    let mut pat1: u64 = 0x0123456789ABCDEF;
    let mut pat2: u64 = 0xFEDCBA9876543210;
    let mut pat3: u64;

    for chunk in rambox.chunks_exact_mut(16) {
        pat3 = pat1;
        pat1 = pat2.rotate_right((pat3 & 63) as u32).wrapping_add(0x111);
        chunk[0] = pat1;
        chunk[1] = pat3;

        pat3 = pat2;
        pat2 = pat1.rotate_right((pat3 & 63) as u32).wrapping_add(0x222);
        chunk[2] = pat2;
        chunk[3] = pat3;

        pat3 = pat1;
        pat1 = pat2.rotate_right((pat3 & 63) as u32).wrapping_add(0x333);
        chunk[4] = pat1;
        chunk[5] = pat3;

        pat3 = pat2;
        pat2 = pat1.rotate_right((pat3 & 63) as u32).wrapping_add(0x444);
        chunk[6] = pat2;
        chunk[7] = pat3;

        pat3 = pat1;
        pat1 = pat2.rotate_right((pat3 & 63) as u32).wrapping_add(0x555);
        chunk[8] = pat1;
        chunk[9] = pat3;

        pat3 = pat2;
        pat2 = pat1.rotate_right((pat3 & 63) as u32).wrapping_add(0x666);
        chunk[10] = pat2;
        chunk[11] = pat3;

        pat3 = pat1;
        pat1 = pat2.rotate_right((pat3 & 63) as u32).wrapping_add(0x777);
        chunk[12] = pat1;
        chunk[13] = pat3;

        pat3 = pat2;
        pat2 = pat1.rotate_right((pat3 & 63) as u32).wrapping_add(0x888);
        chunk[14] = pat2;
        chunk[15] = pat3;
    }
}

/// rf256 的 rambox 查找并更新
///
/// 每次迭代：carry 加上自身 CRC，取模定位单元，按 carry 高位商数
/// 旋转单元值并加回 carry；当 carry 的最高字节小于 0x80 时（约 50%）
/// 把 carry 回写到单元。回写用完整的 64 位值，返回给轮函数的 carry
/// 则折回低 32 位。
pub(crate) fn rf256_rambox_step(rambox: &mut [u64], old: u64, writes: &mut u64) -> u64 {
    let mut old = old;
    for _ in 0..RF256_RAMBOX_LOOPS {
        old = add64_crc32(old);
        let idx = (old as usize) & (RF256_RAMBOX_SIZE - 1);
        let cell = rambox[idx];
        old = old.wrapping_add(cell.rotate_right(((old / RF256_RAMBOX_SIZE as u64) & 63) as u32));
        if (old >> 56) < 0x80 {
            rambox[idx] = old;
            *writes += 1;
        }
    }
    old as u32 as u64
}

/// rfv2 的 rambox 访问窗口与回写记录
///
/// `rb_o`/`rb_l` 把访问限制在由消息 CRC 决定的连续窗口内；
/// `hist`/`prev` 记录被改写单元的下标与旧值，供哈希后回退。
/// 记录容量饱和（`changes == RFV2_RAMBOX_HIST`）表示只能整体恢复。
#[derive(Clone, Debug)]
pub(crate) struct Region {
    rb_o: u64,
    rb_l: u64,
    changes: u16,
    hist: Box<[u32]>,
    prev: Box<[u64]>,
}

impl Region {
    /// 由消息 CRC 派生访问窗口
    ///
    /// `rb_o = msgh % (size/2)`，`rb_l = 2 * (size/2 - rb_o)`：
    /// 窗口起点依赖消息，越靠后的起点窗口越短。
    pub fn from_msg_crc(msgh: u32) -> Self {
        let half = (RFV2_RAMBOX_SIZE / 2) as u64;
        let rb_o = msgh as u64 % half;
        let rb_l = 2 * (half - rb_o);
        Region {
            rb_o,
            rb_l,
            changes: 0,
            hist: vec![0u32; RFV2_RAMBOX_HIST].into_boxed_slice(),
            prev: vec![0u64; RFV2_RAMBOX_HIST].into_boxed_slice(),
        }
    }

    /// rfv2 的 rambox 查找并更新
    ///
    /// 符号位清零时（约 50%）回写，并在记录仍有空位时记下
    /// （下标, 旧值）。记录已满时照常回写，事后只能整体恢复。
    /// 回写用完整的 64 位值，返回的 carry 折回低 32 位。
    pub fn step(&mut self, rambox: &mut [u64], old: u64) -> u64 {
        let mask = self.rb_l - 1;
        let mut old = old;
        for _ in 0..RFV2_RAMBOX_LOOPS {
            old = add64_crc32(old);
            let idx = ((self.rb_o + (old & mask)) & mask) as usize;
            let cell = rambox[idx];
            old = old.wrapping_add(cell.rotate_right(((old / self.rb_l) & 63) as u32));
            if (old as i64) >= 0 {
                if (self.changes as usize) < RFV2_RAMBOX_HIST {
                    self.hist[self.changes as usize] = idx as u32;
                    self.prev[self.changes as usize] = cell;
                    self.changes += 1;
                }
                rambox[idx] = old;
            }
        }
        old as u32 as u64
    }

    /// 只读查找：用于多个工作线程共享一个 rambox 的场景，绝不回写
    pub fn step_shared(&self, rambox: &[u64], old: u64) -> u64 {
        let mask = self.rb_l - 1;
        let mut old = old;
        for _ in 0..RFV2_RAMBOX_LOOPS {
            old = add64_crc32(old);
            let idx = ((self.rb_o + (old & mask)) & mask) as usize;
            let cell = rambox[idx];
            old = old.wrapping_add(cell.rotate_right(((old / self.rb_l) & 63) as u32));
        }
        old as u32 as u64
    }

    /// 回写记录是否已饱和
    pub fn overflowed(&self) -> bool {
        self.changes as usize == RFV2_RAMBOX_HIST
    }

    /// 把 rambox 恢复到哈希前的内容
    ///
    /// 记录未饱和时按单元恢复：给了模板就按下标升序从模板取值，
    /// 否则按记录逆序写回旧值。记录饱和时整体恢复：从模板复制，
    /// 或在没有模板时重新初始化。
    pub fn rewind(&mut self, rambox: &mut [u64], template: Option<&[u64]>) {
        if self.overflowed() {
            match template {
                Some(t) => rambox.copy_from_slice(t),
                None => raminit(rambox),
            }
        } else if let Some(t) = template {
            let mut touched: Vec<u32> = self.hist[..self.changes as usize].to_vec();
            touched.sort_unstable();
            for idx in touched {
                rambox[idx as usize] = t[idx as usize];
            }
        } else {
            for j in (0..self.changes as usize).rev() {
                rambox[self.hist[j] as usize] = self.prev[j];
            }
        }
        self.changes = 0;
    }
}
