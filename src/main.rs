//! RainForest 命令行工具
//!
//! 提供与参考实现一致的四种模式：
//! 1. `-b`：基准测试（`-t N` 指定线程数，每秒打印一次 H/s）
//! 2. `-c`：自检（浮点合规、常量派生、三组参考摘要）
//! 3. `-m <text>`：对字面字符串做 rfv2 哈希
//! 4. `-H <hex>`：对十六进制解码后的字节做 rfv2 哈希
//!
//! # 退出码
//!
//! 成功为 0；自检失败或参数非法为 1。

use std::env;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rainforest::crypto::accel;
use rainforest::crypto::tables::{RF_IV, RF_TABLE, derive_constants};
use rainforest::{
    CHECK_SIN_SUM1, CHECK_SIN_SUM5, RamBox, Rf256Ctx, check_sin, rfv2_hash,
};

const MAX_THREADS: u32 = 256;

/// 全局哈希计数器，基准测试的报告线程每秒取走一次
static HASHES: AtomicU64 = AtomicU64::new(0);

/// 测试消息：一个易于辨认的复杂比特模式
const TEST_MSG: [u8; 80] = [
    0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80,
    0x01, 0x03, 0x05, 0x09, 0x11, 0x21, 0x41, 0x81,
    0x02, 0x02, 0x06, 0x0A, 0x12, 0x22, 0x42, 0x82,
    0x05, 0x06, 0x04, 0x0C, 0x14, 0x24, 0x44, 0x84,
    0x09, 0x0A, 0x0C, 0x08, 0x18, 0x28, 0x48, 0x88,
    0x11, 0x12, 0x14, 0x18, 0x10, 0x30, 0x50, 0x90,
    0x21, 0x22, 0x24, 0x28, 0x30, 0x20, 0x60, 0xA0,
    0x41, 0x42, 0x44, 0x48, 0x50, 0x60, 0x40, 0xC0,
    0x81, 0x82, 0x84, 0x88, 0x90, 0xA0, 0xC0, 0x80,
    0x18, 0x24, 0x42, 0x81, 0x99, 0x66, 0x55, 0xAA,
];

/// 测试消息单次 rfv2 哈希的参考输出
const TEST_MSG_OUT_RFV2: [u8; 32] = [
    0xe9, 0x46, 0xdf, 0xcd, 0x6b, 0x29, 0xc3, 0x9e,
    0xb1, 0x07, 0xca, 0x71, 0xc4, 0x5f, 0xff, 0xf2,
    0xf1, 0xeb, 0x47, 0x30, 0x5c, 0x60, 0x50, 0xa1,
    0x7e, 0x4c, 0x5d, 0x3f, 0x0a, 0xd3, 0x32, 0xcb,
];

/// 测试消息 256 轮 rfv2 反馈循环的参考输出
const TEST_MSG_OUT256_RFV2: [u8; 32] = [
    0xe9, 0x19, 0x7e, 0x12, 0x74, 0xe2, 0x60, 0x28,
    0xb7, 0x6e, 0x2c, 0xe7, 0xdf, 0x78, 0xd8, 0x09,
    0xc0, 0xf3, 0xa2, 0x0e, 0x74, 0xcd, 0x6f, 0x6c,
    0x02, 0x5d, 0x75, 0xc2, 0x2c, 0x45, 0x99, 0x60,
];

/// 测试消息 256 轮 rf256 反馈循环的参考输出
const TEST_MSG_OUT256_RF256: [u8; 32] = [
    0xe9, 0x43, 0x23, 0x27, 0xfb, 0x77, 0xb5, 0x8a,
    0x73, 0x10, 0x15, 0x2a, 0xea, 0x75, 0x16, 0xef,
    0x39, 0x59, 0x47, 0xb9, 0x8d, 0x23, 0xf2, 0x77,
    0x74, 0x3e, 0x7c, 0xa5, 0x6b, 0x17, 0x6c, 0xf9,
];

enum Mode {
    None,
    Bench,
    Check,
    Message(String),
    HexMessage(String),
}

fn main() {
    let mut args = env::args();
    let name = args.next().unwrap_or_else(|| "rainforest".to_string());
    let mut mode = Mode::None;
    let mut threads: u32 = 1;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-b" => mode = Mode::Bench,
            "-c" => mode = Mode::Check,
            "-m" => match args.next() {
                Some(text) => mode = Mode::Message(text),
                None => usage(&name, 1),
            },
            "-H" => match args.next() {
                Some(hex) => mode = Mode::HexMessage(hex),
                None => usage(&name, 1),
            },
            "-t" => {
                let value = match args.next() {
                    Some(v) => v,
                    None => usage(&name, 1),
                };
                threads = value.parse().unwrap_or(0);
                if threads < 1 || threads > MAX_THREADS {
                    println!(
                        "Fatal: threads must be between 1 and {} (was {})",
                        MAX_THREADS, threads
                    );
                    process::exit(1);
                }
            }
            "-h" => usage(&name, 0),
            _ => usage(&name, 1),
        }
    }

    match mode {
        Mode::None => usage(&name, 1),
        Mode::Bench => run_bench(threads),
        Mode::Check => run_check(),
        Mode::Message(text) => hash_message(text.as_bytes()),
        Mode::HexMessage(hex) => match parse_hex(&hex) {
            Some(bytes) => hash_message(&bytes),
            None => usage(&name, 1),
        },
    }
}

fn usage(name: &str, ret: i32) -> ! {
    println!(
        "usage: {} [options]*\n\
         Options :\n\
         \x20 -h           : display this help\n\
         \x20 -b           : benchmark mode\n\
         \x20 -c           : validity check mode\n\
         \x20 -m <text>    : hash this text\n\
         \x20 -H <hex>     : hash these hex-encoded bytes\n\
         \x20 -t <threads> : use this number of threads\n",
        name
    );
    process::exit(ret);
}

fn print256(tag: &str, digest: &[u8; 32]) {
    print!("{}: ", tag);
    for byte in digest {
        print!("{:02x}", byte);
    }
    println!();
}

fn parse_hex(hex: &str) -> Option<Vec<u8>> {
    fn nibble(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }

    let raw = hex.as_bytes();
    if raw.len() & 1 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(raw.len() / 2);
    for pair in raw.chunks_exact(2) {
        bytes.push(nibble(pair[0])? << 4 | nibble(pair[1])?);
    }
    Some(bytes)
}

/// 对一段字节做 rfv2 哈希并打印（内部分配工作区）
fn hash_message(msg: &[u8]) -> ! {
    match rfv2_hash(msg, None, None) {
        Ok(out) => {
            print256("out", &out);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Fatal: {}", e);
            process::exit(1);
        }
    }
}

fn run_check() -> ! {
    let mut ok = true;

    println!("Floating point self-test:");
    let (sum1, sum5) = check_sin();
    if sum1 != CHECK_SIN_SUM1 || sum5 != CHECK_SIN_SUM5 {
        println!(" invalid: sum1={} sum5={}", sum1, sum5);
        println!("expected: sum1={} sum5={}", CHECK_SIN_SUM1, CHECK_SIN_SUM5);
        ok = false;
    } else {
        println!("valid");
    }

    println!("Constant derivation:");
    let (table, iv) = derive_constants();
    if table != RF_TABLE || iv != RF_IV {
        println!(" invalid");
        ok = false;
    } else {
        println!("valid");
    }

    println!("rf256 256-loop hash:");
    match Rf256Ctx::new() {
        Ok(mut ctx) => {
            let mut msg = TEST_MSG;
            let mut out = [0u8; 32];
            for loops in 0..256u32 {
                for byte in msg.iter_mut() {
                    *byte ^= loops as u8;
                }
                out = ctx.hash(&msg);
                msg[..32].copy_from_slice(&out);
            }
            if out != TEST_MSG_OUT256_RF256 {
                print256(" invalid", &out);
                print256("expected", &TEST_MSG_OUT256_RF256);
                ok = false;
            } else {
                print256("valid", &out);
            }
        }
        Err(e) => {
            eprintln!("Fatal: {}", e);
            process::exit(1);
        }
    }

    let mut rambox = match RamBox::for_rfv2() {
        Ok(rambox) => rambox,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            process::exit(1);
        }
    };

    println!("rfv2 single hash:");
    let out = rfv2_hash(&TEST_MSG, Some(&mut rambox), None).unwrap();
    if out != TEST_MSG_OUT_RFV2 {
        print256(" invalid", &out);
        print256("expected", &TEST_MSG_OUT_RFV2);
        ok = false;
    } else {
        print256("valid", &out);
    }

    println!("rfv2 256-loop hash:");
    let mut msg = TEST_MSG;
    let mut out = [0u8; 32];
    for loops in 0..256u32 {
        for byte in msg.iter_mut() {
            *byte ^= loops as u8;
        }
        out = rfv2_hash(&msg, Some(&mut rambox), None).unwrap();
        msg[..32].copy_from_slice(&out);
    }
    if out != TEST_MSG_OUT256_RFV2 {
        print256(" invalid", &out);
        print256("expected", &TEST_MSG_OUT256_RFV2);
        ok = false;
    } else {
        print256("valid", &out);
    }

    process::exit(if ok { 0 } else { 1 });
}

fn bench_worker() {
    let mut rambox = match RamBox::for_rfv2() {
        Ok(rambox) => rambox,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            process::exit(1);
        }
    };

    let mut msg = TEST_MSG;
    let mut loops: u32 = 0;
    loop {
        // 每圈都先扰动消息，再把输出折回消息开头
        for byte in msg.iter_mut() {
            *byte ^= loops as u8;
        }
        let out = rfv2_hash(&msg, Some(&mut rambox), None).unwrap();
        msg[..32].copy_from_slice(&out);
        loops = loops.wrapping_add(1);
        HASHES.fetch_add(1, Ordering::Relaxed);
    }
}

fn run_bench(threads: u32) -> ! {
    println!("accelerator: {}", accel::accel().name());

    for _ in 0..threads {
        thread::spawn(bench_worker);
    }

    let mut last = Instant::now();
    loop {
        thread::sleep(Duration::from_secs(1));
        let now = Instant::now();
        let work = HASHES.swap(0, Ordering::Relaxed);
        let elapsed = now.duration_since(last).as_secs_f64();
        last = now;

        println!(
            "{} hashes, {:.3} sec, {} thread{}, {:.3} H/s, {:.3} H/s/thread",
            work,
            elapsed,
            threads,
            if threads > 1 { "s" } else { "" },
            work as f64 / elapsed,
            work as f64 / elapsed / threads as f64,
        );
    }
}
