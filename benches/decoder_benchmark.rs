//! Decoder performance benchmarks.
//!
//! Baselines for:
//! - GF(256) bulk row kernels (add, mul, fused multiply-subtract)
//! - Full-block absorption throughput by field, symbol count, and symbol size
//! - The swap path against the plain raw path

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use linblock::decoder::BlockDecoder;
use linblock::encoder::BlockEncoder;
use linblock::field::gf256::{gf256_add_slice, gf256_addmul_slice, gf256_mul_slice, Gf256};
use linblock::field::gf2::Gf2;
use linblock::field::BlockField;
use linblock::util::DetRng;

fn deterministic_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = DetRng::new(seed);
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

fn bench_gf256_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("gf256_primitives");
    for len in [64usize, 1024, 8192] {
        let src = deterministic_bytes(len, 1);
        let mut dst = deterministic_bytes(len, 2);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("add_slice", len), &len, |b, _| {
            b.iter(|| gf256_add_slice(&mut dst, &src));
        });
        group.bench_with_input(BenchmarkId::new("mul_slice", len), &len, |b, _| {
            b.iter(|| gf256_mul_slice(&mut dst, Gf256(0x53)));
        });
        group.bench_with_input(BenchmarkId::new("addmul_slice", len), &len, |b, _| {
            b.iter(|| gf256_addmul_slice(&mut dst, &src, Gf256(0x53)));
        });
    }
    group.finish();
}

/// Pre-draws enough coded packets to complete one block, then measures
/// absorbing them all.
fn bench_block_decode<F: BlockField>(c: &mut Criterion, label: &str) {
    let mut group = c.benchmark_group(format!("block_decode_{label}"));
    for (symbols, symbol_size) in [(16usize, 256usize), (64, 256), (64, 1280)] {
        let data = deterministic_bytes(symbols * symbol_size, 3);
        let mut encoder = BlockEncoder::<F>::new(symbols, symbol_size);
        encoder.initialize(symbols, symbol_size);
        encoder.set_symbols(&data);

        // Draw a packet pool large enough to always reach full rank.
        let mut rng = DetRng::new(4);
        let pool: Vec<(Vec<u8>, Vec<u8>)> = (0..symbols * 2)
            .map(|_| {
                let mut payload = vec![0u8; symbol_size];
                let mut vector = vec![0u8; encoder.vector_len()];
                encoder.encode(&mut rng, &mut payload, &mut vector);
                (payload, vector)
            })
            .collect();

        let mut decoder = BlockDecoder::<F>::new(symbols, symbol_size);
        group.throughput(Throughput::Bytes((symbols * symbol_size) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("k{symbols}_m{symbol_size}")),
            &pool,
            |b, pool| {
                let mut payload = vec![0u8; symbol_size];
                let mut vector = vec![0u8; encoder.vector_len()];
                b.iter(|| {
                    decoder.initialize(symbols, symbol_size);
                    for (pool_payload, pool_vector) in pool {
                        if decoder.is_complete() {
                            break;
                        }
                        payload.copy_from_slice(pool_payload);
                        vector.copy_from_slice(pool_vector);
                        decoder.decode(&mut payload, &mut vector);
                    }
                    assert!(decoder.is_complete());
                });
            },
        );
    }
    group.finish();
}

fn bench_block_decode_gf2(c: &mut Criterion) {
    bench_block_decode::<Gf2>(c, "gf2");
}

fn bench_block_decode_gf256(c: &mut Criterion) {
    bench_block_decode::<Gf256>(c, "gf256");
}

/// Raw symbols into coded slots (swap) versus raw symbols into empty slots.
fn bench_swap_path(c: &mut Criterion) {
    let symbols = 32;
    let symbol_size = 256;
    let data = deterministic_bytes(symbols * symbol_size, 5);

    let mut encoder = BlockEncoder::<Gf256>::new(symbols, symbol_size);
    encoder.initialize(symbols, symbol_size);
    encoder.set_symbols(&data);

    // Coded packets that fill every slot, so each raw arrival must swap.
    let mut rng = DetRng::new(6);
    let pool: Vec<(Vec<u8>, Vec<u8>)> = (0..symbols * 2)
        .map(|_| {
            let mut payload = vec![0u8; symbol_size];
            let mut vector = vec![0u8; symbols];
            encoder.encode(&mut rng, &mut payload, &mut vector);
            (payload, vector)
        })
        .collect();

    let mut group = c.benchmark_group("raw_absorption");
    let mut decoder = BlockDecoder::<Gf256>::new(symbols, symbol_size);

    group.bench_function("into_empty_slots", |b| {
        b.iter(|| {
            decoder.initialize(symbols, symbol_size);
            for index in 0..symbols {
                decoder.decode_raw(&data[index * symbol_size..(index + 1) * symbol_size], index);
            }
        });
    });

    group.bench_function("into_coded_slots", |b| {
        let mut payload = vec![0u8; symbol_size];
        let mut vector = vec![0u8; symbols];
        b.iter(|| {
            decoder.initialize(symbols, symbol_size);
            for (pool_payload, pool_vector) in &pool {
                if decoder.is_complete() {
                    break;
                }
                payload.copy_from_slice(pool_payload);
                vector.copy_from_slice(pool_vector);
                decoder.decode(&mut payload, &mut vector);
            }
            for index in 0..symbols {
                decoder.decode_raw(&data[index * symbol_size..(index + 1) * symbol_size], index);
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_gf256_primitives,
    bench_block_decode_gf2,
    bench_block_decode_gf256,
    bench_swap_path
);
criterion_main!(benches);
