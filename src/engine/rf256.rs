//! rf256（v1）：2 MiB 工作区的纯整数版本
//!
//! 上下文自持 rambox，每次 `init` 都重新初始化它，因此同一个上下文
//! 可以在多次哈希间复用而无需重新分配。工作区在哈希过程中被改写，
//! 同一时刻只能属于一个上下文。

use crate::engine::rambox::{RamBox, RamBoxError, rf256_rambox_step};
use crate::engine::round::{RoundCore, absorb};

/// rf256 的默认种子 CRC
pub const RF256_INIT_CRC: u32 = 20180213;

/// rf256 哈希上下文
///
/// # 使用示例
///
/// ```rust
/// use rainforest::Rf256Ctx;
///
/// let mut ctx = Rf256Ctx::new().unwrap();
/// let digest = ctx.hash(b"abc");
/// assert_eq!(digest.len(), 32);
/// ```
pub struct Rf256Ctx {
    core: RoundCore,
    rambox: RamBox,
    writes: u64,
}

impl Rf256Ctx {
    /// 分配工作区并构造已初始化的上下文
    ///
    /// # 返回
    ///
    /// - `Ok(Rf256Ctx)`: 可直接使用的上下文
    /// - `Err(RamBoxError)`: 2 MiB 工作区分配失败
    pub fn new() -> Result<Self, RamBoxError> {
        Ok(Rf256Ctx {
            core: RoundCore::new(RF256_INIT_CRC),
            rambox: RamBox::for_rf256()?,
            writes: 0,
        })
    }

    /// 以默认种子重置上下文，rambox 重新初始化
    pub fn init(&mut self) {
        self.init_with_seed(RF256_INIT_CRC);
    }

    /// 以指定种子重置上下文
    pub fn init_with_seed(&mut self, seed: u32) {
        self.rambox.reinit();
        self.core = RoundCore::new(seed);
        self.writes = 0;
    }

    fn round_once(&mut self) {
        let Rf256Ctx {
            core,
            rambox,
            writes,
        } = self;
        core.one_round(false, |old| {
            rf256_rambox_step(rambox.as_mut_slice(), old, writes)
        });
    }

    /// 向上下文追加消息字节
    pub fn update(&mut self, msg: &[u8]) {
        let Rf256Ctx {
            core,
            rambox,
            writes,
        } = self;
        absorb(core, msg, |core| {
            core.one_round(false, |old| {
                rf256_rambox_step(rambox.as_mut_slice(), old, writes)
            });
        });
    }

    /// 结束哈希并导出 32 字节摘要
    ///
    /// 未凑满 4 字节的尾部先补一轮；不足 256 位输入时按缺少的
    /// 4 字节块逐一补轮；最后固定追加 4 轮收尾。导出摘要后上下文
    /// 需要重新 `init` 才能继续使用。
    pub fn finalize(&mut self) -> [u8; 32] {
        if self.core.len & 3 != 0 {
            self.round_once();
        }

        let mut pad = 0u32;
        while pad + self.core.len < 32 {
            self.round_once();
            pad += 4;
        }

        for _ in 0..4 {
            self.round_once();
        }
        self.core.digest()
    }

    /// 以默认种子做一次完整哈希
    pub fn hash(&mut self, msg: &[u8]) -> [u8; 32] {
        self.hash_with_seed(msg, RF256_INIT_CRC)
    }

    /// 以指定种子做一次完整哈希
    pub fn hash_with_seed(&mut self, msg: &[u8], seed: u32) -> [u8; 32] {
        self.init_with_seed(seed);
        self.update(msg);
        self.finalize()
    }

    /// 最近一次哈希（自上次 `init` 起）发生的 rambox 回写次数
    pub fn write_events(&self) -> u64 {
        self.writes
    }
}

/// 一次性计算 rf256 摘要（内部分配工作区）
pub fn rf256_hash(msg: &[u8]) -> Result<[u8; 32], RamBoxError> {
    rf256_hash2(msg, RF256_INIT_CRC)
}

/// 一次性计算带种子的 rf256 摘要
pub fn rf256_hash2(msg: &[u8], seed: u32) -> Result<[u8; 32], RamBoxError> {
    let mut ctx = Rf256Ctx::new()?;
    Ok(ctx.hash_with_seed(msg, seed))
}
