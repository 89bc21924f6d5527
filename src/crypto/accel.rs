//! CPU 加密指令加速抽象
//!
//! 该模块定义热路径原语（两轮 AES、CRC32）的加速接口，并在进程启动时
//! 根据 CPU 特性一次性选择实现：
//!
//! - `PortableAccel`: 纯软件实现，任何平台可用
//! - `AesniAccel`: x86-64 AES-NI 数据块加密（CRC32 仍走查表）
//! - `ArmCryptoAccel`: ARMv8 crypto + crc 扩展
//!
//! 哈希输出与所选实现无关，加速器只能改变速度，不能改变结果。

use std::sync::LazyLock;

use crate::crypto::{aes2r, crc32};

/// CPU 加速器 trait
///
/// 定义哈希核心依赖的两类原语。实现必须与可移植实现逐位一致。
///
/// # 实现者
///
/// - `PortableAccel`: 软件回退实现
/// - `AesniAccel`: x86-64 AES-NI
/// - `ArmCryptoAccel`: ARMv8 crypto/crc 扩展
pub trait CryptoAccel: Send + Sync {
    /// 实现名称，用于诊断输出
    fn name(&self) -> &'static str;
    /// 两轮 AES-128 加密，结果就地写回
    fn aes2r_encrypt(&self, block: &mut [u8; 16], key: &[u8; 16]);
    /// 折入 8 位消息的 CRC32
    fn crc32_8(&self, crc: u32, msg: u32) -> u32;
    /// 折入 16 位消息的 CRC32
    fn crc32_16(&self, crc: u32, msg: u32) -> u32;
    /// 折入 24 位消息的 CRC32
    fn crc32_24(&self, crc: u32, msg: u32) -> u32;
    /// 折入 32 位消息的 CRC32
    fn crc32_32(&self, crc: u32, msg: u32) -> u32;
    /// 折入 64 位消息的 CRC32
    fn crc32_64(&self, crc: u32, msg: u64) -> u32;
}

/// 纯软件实现
pub struct PortableAccel;

impl CryptoAccel for PortableAccel {
    fn name(&self) -> &'static str {
        "portable"
    }

    fn aes2r_encrypt(&self, block: &mut [u8; 16], key: &[u8; 16]) {
        aes2r::encrypt_portable(block, key);
    }

    fn crc32_8(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_8(crc, msg)
    }

    fn crc32_16(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_16(crc, msg)
    }

    fn crc32_24(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_24(crc, msg)
    }

    fn crc32_32(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_32(crc, msg)
    }

    fn crc32_64(&self, crc: u32, msg: u64) -> u32 {
        crc32::crc32_64(crc, msg)
    }
}

/// x86-64 AES-NI 实现
///
/// 数据块加密走 `AESENC`；CRC32 仍用查表实现，因为 SSE4.2 的 `crc32`
/// 指令计算的是 Castagnoli 多项式而非 802.3 多项式。
#[cfg(target_arch = "x86_64")]
pub struct AesniAccel;

#[cfg(target_arch = "x86_64")]
impl CryptoAccel for AesniAccel {
    fn name(&self) -> &'static str {
        "x86-64 aes-ni"
    }

    fn aes2r_encrypt(&self, block: &mut [u8; 16], key: &[u8; 16]) {
        // 构造时已确认 CPU 支持 AES-NI
        unsafe { aesni::aes2r_encrypt(block, key) }
    }

    fn crc32_8(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_8(crc, msg)
    }

    fn crc32_16(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_16(crc, msg)
    }

    fn crc32_24(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_24(crc, msg)
    }

    fn crc32_32(&self, crc: u32, msg: u32) -> u32 {
        crc32::crc32_32(crc, msg)
    }

    fn crc32_64(&self, crc: u32, msg: u64) -> u32 {
        crc32::crc32_64(crc, msg)
    }
}

#[cfg(target_arch = "x86_64")]
mod aesni {
    use core::arch::x86_64::{
        __m128i, _mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128, _mm_xor_si128,
    };

    use crate::crypto::aes2r;

    #[target_feature(enable = "aes")]
    pub unsafe fn aes2r_encrypt(block: &mut [u8; 16], key: &[u8; 16]) {
        let (k0, k1, k2) = aes2r::expand_keys(key);
        unsafe {
            let mut state = _mm_loadu_si128(block.as_ptr() as *const __m128i);
            let rk0 = _mm_loadu_si128(k0.as_ptr() as *const __m128i);
            let rk1 = _mm_loadu_si128(k1.as_ptr() as *const __m128i);
            let rk2 = _mm_loadu_si128(k2.as_ptr() as *const __m128i);

            state = _mm_xor_si128(state, rk0);
            state = _mm_aesenc_si128(state, rk1);
            state = _mm_aesenc_si128(state, rk2);
            _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, state);
        }
    }
}

/// ARMv8 crypto + crc 扩展实现
#[cfg(target_arch = "aarch64")]
pub struct ArmCryptoAccel;

#[cfg(target_arch = "aarch64")]
impl CryptoAccel for ArmCryptoAccel {
    fn name(&self) -> &'static str {
        "armv8 crypto+crc"
    }

    fn aes2r_encrypt(&self, block: &mut [u8; 16], key: &[u8; 16]) {
        // 构造时已确认 CPU 支持 aes 与 crc 扩展
        unsafe { armv8::aes2r_encrypt(block, key) }
    }

    fn crc32_8(&self, crc: u32, msg: u32) -> u32 {
        unsafe { armv8::crc32_8(crc, msg) }
    }

    fn crc32_16(&self, crc: u32, msg: u32) -> u32 {
        unsafe { armv8::crc32_16(crc, msg) }
    }

    fn crc32_24(&self, crc: u32, msg: u32) -> u32 {
        unsafe { armv8::crc32_24(crc, msg) }
    }

    fn crc32_32(&self, crc: u32, msg: u32) -> u32 {
        unsafe { armv8::crc32_32(crc, msg) }
    }

    fn crc32_64(&self, crc: u32, msg: u64) -> u32 {
        unsafe { armv8::crc32_64(crc, msg) }
    }
}

#[cfg(target_arch = "aarch64")]
mod armv8 {
    use core::arch::aarch64::{
        __crc32b, __crc32d, __crc32h, __crc32w, uint8x16_t, vaeseq_u8, vaesmcq_u8, veorq_u8,
        vld1q_u8, vst1q_u8,
    };

    use crate::crypto::aes2r;

    #[target_feature(enable = "aes")]
    pub unsafe fn aes2r_encrypt(block: &mut [u8; 16], key: &[u8; 16]) {
        let (k0, k1, k2) = aes2r::expand_keys(key);
        unsafe {
            let state = vld1q_u8(block.as_ptr());
            let rk0: uint8x16_t = vld1q_u8(k0.as_ptr());
            let rk1 = vld1q_u8(k1.as_ptr());
            let rk2 = vld1q_u8(k2.as_ptr());

            let mut state = vaesmcq_u8(vaeseq_u8(state, rk0));
            state = vaesmcq_u8(vaeseq_u8(state, rk1));
            state = veorq_u8(state, rk2);
            vst1q_u8(block.as_mut_ptr(), state);
        }
    }

    #[target_feature(enable = "crc")]
    pub unsafe fn crc32_8(crc: u32, msg: u32) -> u32 {
        unsafe { __crc32b(crc, msg as u8) }
    }

    #[target_feature(enable = "crc")]
    pub unsafe fn crc32_16(crc: u32, msg: u32) -> u32 {
        unsafe { __crc32h(crc, msg as u16) }
    }

    #[target_feature(enable = "crc")]
    pub unsafe fn crc32_24(crc: u32, msg: u32) -> u32 {
        unsafe { __crc32h(__crc32b(crc, msg as u8), (msg >> 8) as u16) }
    }

    #[target_feature(enable = "crc")]
    pub unsafe fn crc32_32(crc: u32, msg: u32) -> u32 {
        unsafe { __crc32w(crc, msg) }
    }

    #[target_feature(enable = "crc")]
    pub unsafe fn crc32_64(crc: u32, msg: u64) -> u32 {
        unsafe { __crc32d(crc, msg) }
    }
}

static ACCEL: LazyLock<&'static dyn CryptoAccel> = LazyLock::new(|| {
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("aes") {
            return &AesniAccel;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("aes")
            && std::arch::is_aarch64_feature_detected!("crc")
        {
            return &ArmCryptoAccel;
        }
    }
    &PortableAccel
});

/// 返回进程级加速器实例
#[inline]
pub fn accel() -> &'static dyn CryptoAccel {
    *ACCEL
}

/// 返回可移植实现，供一致性测试对照
pub fn portable() -> &'static dyn CryptoAccel {
    &PortableAccel
}
