//! IEEE-754 浮点扰动
//!
//! rfv2 借助双精度超越函数的精确舍入行为排除简化浮点栈：`sin()` 与
//! `pow()` 必须以完整的 IEEE-754 double 计算，`-ffast-math` 式的优化
//! 或 32 位 / 定点近似都会产生不同的哈希。[`check_sin`] 对照两个
//! 参考校验和来检测这类偏差。

/// `check_sin` 的 sin 校验和期望值
pub const CHECK_SIN_SUM1: u64 = 300239689190865;
/// `check_sin` 的 pow(sin, 5) 校验和期望值
pub const CHECK_SIN_SUM5: u64 = 300239688428374;

/// 缩放后的正弦值：`int32(sin(x) * 65536)`
///
/// nonce 扫描用它做快速过滤：只有 `sin_scaled(msgh) == 2` 的 nonce
/// 才会进入完整哈希。
#[inline]
pub fn sin_scaled(x: u32) -> i32 {
    ((x as f64).sin() * 65536.0) as i32
}

/// 每轮浮点扰动值：`int64((pow(sin(d), 5) + sin(d)) * 65536)`，
/// 其中 `d = crc / 16.0`
#[inline]
pub(crate) fn fp_mix(crc: u32) -> u64 {
    let d = (crc as f64) / 16.0;
    let s = d.sin();
    ((s.powf(5.0) + s) * 65536.0) as i64 as u64
}

/// 验证 sin() 与 pow() 的行为是否符合预期
///
/// 在 i ∈ [-0x11111, 0x11111)（按 32 位无符号回绕遍历）上累加
/// `int32(sin(i/16) * 65536) ^ prev ^ i` 及 pow(sin, 5) 的对应和。
/// 合规实现必须得到 ([`CHECK_SIN_SUM1`], [`CHECK_SIN_SUM5`])。
///
/// # 返回
///
/// 两个校验和 `(sum1, sum5)`
pub fn check_sin() -> (u64, u64) {
    let stop: u32 = 0x11111;
    let mut i: u32 = 0u32.wrapping_sub(0x11111);
    let mut prev1: u32 = 0;
    let mut prev5: u32 = 0;
    let mut sum1: u64 = 0;
    let mut sum5: u64 = 0;

    loop {
        let d = (i as f64) / 16.0;
        let next1 = (d.sin() * 65536.0) as i32 as u32;
        let next5 = (d.sin().powf(5.0) * 65536.0) as i32 as u32;
        sum1 = sum1.wrapping_add((next1 ^ prev1 ^ i) as u64);
        prev1 = next1;
        sum5 = sum5.wrapping_add((next5 ^ prev5 ^ i) as u64);
        prev5 = next5;
        i = i.wrapping_add(1);
        if i == stop {
            break;
        }
    }
    (sum1, sum5)
}
