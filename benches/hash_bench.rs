//! 完整哈希吞吐量基准
//!
//! rf256 每次哈希都会重新初始化 2 MiB 工作区，因此它的成绩主要由
//! 初始化带宽决定；rfv2 复用调用方工作区，成绩反映查找与回退成本。

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use rainforest::{RamBox, Rf256Ctx, rfv2_hash};

fn test_message() -> [u8; 80] {
    let mut msg = [0u8; 80];
    for (i, byte) in msg.iter_mut().enumerate() {
        *byte = i as u8;
    }
    msg
}

fn bench_rf256(c: &mut Criterion) {
    let msg = test_message();
    let mut ctx = Rf256Ctx::new().expect("rambox allocation");

    c.bench_function("rf256 80-byte hash", |b| {
        b.iter(|| ctx.hash(black_box(&msg)));
    });
}

fn bench_rfv2(c: &mut Criterion) {
    let msg = test_message();
    let mut rambox = RamBox::for_rfv2().expect("rambox allocation");

    c.bench_function("rfv2 80-byte hash", |b| {
        b.iter(|| rfv2_hash(black_box(&msg), Some(&mut rambox), None).unwrap());
    });
}

criterion_group!(benches, bench_rf256, bench_rfv2);
criterion_main!(benches);
