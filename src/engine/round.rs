//! 轮函数
//!
//! 一轮恰好消耗 32 位输入并扰动整个 256 位状态。两个版本共用同一
//! 轮函数骨架，版本差异通过 rambox 查找回调与浮点扰动开关注入。
//! 每轮扰动输出的 128 位，其中 96 位与上一轮重叠、32 位为新；
//! 连续 5 轮之后每个输出位依赖于每个输入位。

use crate::crypto::accel::accel;
use crate::crypto::{fpmath, tables};
use crate::engine::state::HashState;

/// 轮函数核心状态：256 位哈希、滚动 CRC、待注入输入字、字节计数
#[derive(Clone, Debug)]
pub(crate) struct RoundCore {
    pub hash: HashState,
    pub crc: u32,
    pub word: u32,
    pub len: u32,
}

impl RoundCore {
    /// 以种子 CRC 构造初始核心状态
    pub fn new(seed: u32) -> Self {
        RoundCore {
            hash: HashState::from_iv(),
            crc: seed,
            word: 0,
            len: 0,
        }
    }

    /// 把滚动 CRC 混入低 4 个状态字，返回新的 CRC
    #[inline]
    pub(crate) fn scramble(&mut self) -> u32 {
        let a = accel();
        let mut crc = self.crc;
        for word in self.hash.d[..4].iter_mut() {
            crc = a.crc32_32(crc, *word);
            *word = crc;
        }
        self.crc = crc;
        crc
    }

    /// 先 scramble，再按 `len` 的低 2 位选择宽度折入待注入的输入字
    #[inline]
    fn inject(&mut self) {
        let a = accel();
        let crc = self.scramble();
        self.crc = match self.len & 3 {
            0 => a.crc32_32(crc, self.word),
            3 => a.crc32_24(crc, self.word),
            2 => a.crc32_16(crc, self.word),
            _ => a.crc32_8(crc, self.word),
        };
        self.word = 0;
    }

    /// 除法/取模盒：对前两个 64 位字做字节交换加除法扰动
    pub(crate) fn divbox(&mut self) {
        let v0 = self.hash.q(0);
        let v1 = self.hash.q(1);

        //---- 低位字 ----
        let mut pl = !v0;
        let mut ql = v0.swap_bytes();
        if pl == 0 || ql == 0 {
            pl = 0;
            ql = 0;
        } else if pl > ql {
            let p = pl;
            pl = p / ql;
            ql = p % ql;
        } else {
            let p = pl;
            pl = ql / p;
            ql %= p;
        }

        //---- 高位字 ----
        let mut ph = !v1;
        let mut qh = v1.swap_bytes();
        if ph == 0 || qh == 0 {
            ph = 0;
            qh = 0;
        } else if ph > qh {
            let p = ph;
            ph = p / qh;
            qh = p % qh;
        } else {
            let p = ph;
            ph = qh / p;
            qh %= p;
        }

        let pl = pl.wrapping_add(qh);
        let ph = ph.wrapping_add(ql);
        self.hash.set_q(0, v0.wrapping_sub(pl));
        self.hash.set_q(1, v1.wrapping_sub(ph));
    }

    /// 旋转/加法盒：查表加偏移并按数据自身的低字节反复旋转
    pub(crate) fn rotbox(&mut self, b0: u8, b1: u8) {
        let mut l = self.hash.q(0);
        let mut h = self.hash.q(1);
        let mut b0 = b0;
        let mut b1 = b1;

        l = l.rotate_right(b0 as u32);
        h = h.rotate_left(b1 as u32);
        l = l.wrapping_add(tables::wltable(b0));
        h = h.wrapping_add(tables::whtable(b1));
        b0 = l as u8;
        b1 = h as u8;
        l = l.rotate_left(b1 as u32);
        h = h.rotate_right(b0 as u32);
        b0 = l as u8;
        b1 = h as u8;
        l = l.rotate_right(b1 as u32);
        h = h.rotate_left(b0 as u32);
        self.hash.set_q(0, l);
        self.hash.set_q(1, h);
    }

    /// 用状态的高 128 位做密钥，对低 128 位执行两轮 AES 加密
    fn aesenc(&mut self) {
        let mut block = [0u8; 16];
        let mut key = [0u8; 16];
        for i in 0..4 {
            block[4 * i..4 * i + 4].copy_from_slice(&self.hash.d[i].to_le_bytes());
            key[4 * i..4 * i + 4].copy_from_slice(&self.hash.d[i + 4].to_le_bytes());
        }
        accel().aes2r_encrypt(&mut block, &key);
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            self.hash.d[i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
    }

    /// 执行一轮：消耗已积累的 32 位输入，完整扰动 256 位状态
    ///
    /// # 参数
    ///
    /// * `fp_mix` - 是否在开场序列后加入浮点扰动（仅 rfv2）
    /// * `rambox` - rambox 查找回调，输入上一个 carry，返回新的 carry
    pub fn one_round(&mut self, fp_mix: bool, mut rambox: impl FnMut(u64) -> u64) {
        self.hash.rot32x256();

        let mut carry = ((self.len as u64) << 32) + self.crc as u64;
        self.scramble();
        self.divbox();
        self.scramble();
        if fp_mix {
            let q0 = self.hash.q(0).wrapping_add(fpmath::fp_mix(self.crc));
            self.hash.set_q(0, q0);
        }

        for shift in [0u32, 8, 16] {
            carry = rambox(carry);
            self.rotbox((carry >> shift) as u8, (carry >> (56 - shift)) as u8);
            self.scramble();
            self.divbox();
            self.scramble();
            self.divbox();
            self.scramble();
        }

        carry = rambox(carry);
        self.rotbox((carry >> 24) as u8, (carry >> 32) as u8);
        self.scramble();
        self.divbox();
        self.inject();
        self.aesenc();
        self.scramble();
    }

    /// 导出 32 字节摘要
    pub fn digest(&self) -> [u8; 32] {
        self.hash.to_bytes()
    }
}

/// 按 4 字节一组把消息喂给轮函数
///
/// 快路径：计数对齐且剩余不少于 4 字节时整字读入；
/// 慢路径：逐字节移入，凑满 4 字节触发一轮。
pub(crate) fn absorb(core: &mut RoundCore, msg: &[u8], mut round: impl FnMut(&mut RoundCore)) {
    let mut msg = msg;
    while !msg.is_empty() {
        if core.len & 3 == 0 && msg.len() >= 4 {
            core.word = u32::from_le_bytes([msg[0], msg[1], msg[2], msg[3]]);
            core.len = core.len.wrapping_add(4);
            round(core);
            msg = &msg[4..];
            continue;
        }
        core.word |= (msg[0] as u32) << (8 * (core.len & 3));
        core.len = core.len.wrapping_add(1);
        msg = &msg[1..];
        if core.len & 3 == 0 {
            round(core);
        }
    }
}
