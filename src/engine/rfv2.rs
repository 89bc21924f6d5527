//! rfv2（v2）：96 MiB 工作区、浮点扰动与两遍外层结构
//!
//! 外层流程：先对整条消息求 CRC 得到 `msgh`，由它派生 rambox 访问
//! 窗口，然后对消息做两遍吸收（每遍后补零到 128 位边界），最后
//! 4 轮收尾。借用调用方工作区时，哈希结束后把被改写的单元恢复原状，
//! 因此同一个工作区可以连续服务多次哈希而无需重新初始化。

use crate::crypto::crc32::crc32_mem;
use crate::engine::rambox::{RamBox, RamBoxError, Region};
use crate::engine::round::{RoundCore, absorb};

/// rfv2 的默认种子 CRC
pub const RFV2_INIT_CRC: u32 = 0x20180213;

/// rfv2 哈希上下文：轮函数核心加 rambox 访问窗口
#[derive(Clone, Debug)]
pub(crate) struct Rfv2Ctx {
    core: RoundCore,
    region: Region,
}

impl Rfv2Ctx {
    /// 由种子与消息 CRC 构造上下文
    pub fn new(seed: u32, msgh: u32) -> Self {
        Rfv2Ctx {
            core: RoundCore::new(seed),
            region: Region::from_msg_crc(msgh),
        }
    }

    fn round_once(&mut self, rambox: &mut [u64]) {
        let Rfv2Ctx { core, region } = self;
        core.one_round(true, |old| region.step(rambox, old));
    }

    fn round_once_shared(&mut self, rambox: &[u64]) {
        let Rfv2Ctx { core, region } = self;
        core.one_round(true, |old| region.step_shared(rambox, old));
    }

    /// 向上下文追加消息字节
    pub fn update(&mut self, rambox: &mut [u64], msg: &[u8]) {
        let Rfv2Ctx { core, region } = self;
        absorb(core, msg, |core| {
            core.one_round(true, |old| region.step(rambox, old));
        });
    }

    fn update_shared(&mut self, rambox: &[u64], msg: &[u8]) {
        let Rfv2Ctx { core, region } = self;
        absorb(core, msg, |core| {
            core.one_round(true, |old| region.step_shared(rambox, old));
        });
    }

    /// 用零字节补齐到下一个 128 位边界
    pub fn pad128(&mut self, rambox: &mut [u64]) {
        const ZERO: [u8; 16] = [0u8; 16];
        let pad = (16 - (self.core.len as usize & 15)) & 15;
        if pad > 0 {
            self.update(rambox, &ZERO[..pad]);
        }
    }

    fn pad128_shared(&mut self, rambox: &[u64]) {
        const ZERO: [u8; 16] = [0u8; 16];
        let pad = (16 - (self.core.len as usize & 15)) & 15;
        if pad > 0 {
            self.update_shared(rambox, &ZERO[..pad]);
        }
    }

    /// 补齐后固定 4 轮收尾，导出 32 字节摘要
    pub fn finalize(&mut self, rambox: &mut [u64]) -> [u8; 32] {
        self.pad128(rambox);
        for _ in 0..4 {
            self.round_once(rambox);
        }
        self.core.digest()
    }

    /// 两遍外层流程：吸收、补齐、再吸收、再补齐、收尾
    pub fn run(&mut self, rambox: &mut [u64], msg: &[u8]) -> [u8; 32] {
        self.update(rambox, msg);
        self.pad128(rambox);
        self.update(rambox, msg);
        self.pad128(rambox);
        self.finalize(rambox)
    }

    fn run_shared(&mut self, rambox: &[u64], msg: &[u8]) -> [u8; 32] {
        self.update_shared(rambox, msg);
        self.pad128_shared(rambox);
        self.update_shared(rambox, msg);
        self.pad128_shared(rambox);
        for _ in 0..4 {
            self.round_once_shared(rambox);
        }
        self.core.digest()
    }

    /// 把借用的 rambox 恢复到哈希前的内容
    pub fn rewind(&mut self, rambox: &mut [u64], template: Option<&[u64]>) {
        self.region.rewind(rambox, template);
    }
}

/// 以默认种子计算 rfv2 摘要
///
/// # 参数
///
/// * `msg` - 输入消息
/// * `rambox` - 调用方工作区；传 `None` 时在内部临时分配 96 MiB
/// * `template` - 预初始化的只读模板，用于快速恢复/初始化工作区
///
/// # 返回
///
/// - `Ok([u8; 32])`: 摘要；借用的工作区已恢复到调用前的内容
/// - `Err(RamBoxError)`: 内部分配工作区失败（仅 `rambox` 为 `None` 时）
pub fn rfv2_hash(
    msg: &[u8],
    rambox: Option<&mut RamBox>,
    template: Option<&RamBox>,
) -> Result<[u8; 32], RamBoxError> {
    rfv2_hash2(msg, rambox, template, RFV2_INIT_CRC)
}

/// 以指定种子计算 rfv2 摘要
pub fn rfv2_hash2(
    msg: &[u8],
    rambox: Option<&mut RamBox>,
    template: Option<&RamBox>,
    seed: u32,
) -> Result<[u8; 32], RamBoxError> {
    let msgh = crc32_mem(seed, msg);
    let mut ctx = Rfv2Ctx::new(seed, msgh);

    match rambox {
        Some(area) => {
            let out = ctx.run(area.as_mut_slice(), msg);
            ctx.rewind(area.as_mut_slice(), template.map(|t| t.as_slice()));
            Ok(out)
        }
        None => {
            let mut area = match template {
                Some(t) => RamBox::try_from_template(t)?,
                None => RamBox::for_rfv2()?,
            };
            Ok(ctx.run(area.as_mut_slice(), msg))
        }
    }
}

/// 在多个线程共享的只读 rambox 上计算 rfv2 摘要
///
/// 该路径绝不回写工作区，因此多个工作线程可以并发共享同一块已
/// 初始化的 rambox。注意：跳过回写意味着当一轮本应读到此前某轮
/// 自己写入的单元时，结果会与可写路径不同。
pub fn rfv2_hash_shared(msg: &[u8], rambox: &RamBox) -> [u8; 32] {
    let msgh = crc32_mem(RFV2_INIT_CRC, msg);
    let mut ctx = Rfv2Ctx::new(RFV2_INIT_CRC, msgh);
    ctx.run_shared(rambox.as_slice(), msg)
}

/// 重新初始化一块 rfv2 工作区
pub fn rfv2_raminit(area: &mut RamBox) {
    area.reinit();
}
