//! Benchmarks for class file decoding and rendering.
//!
//! A synthetic class with many methods is generated once and then:
//! - parsed into the model
//! - decoded as raw bytecode
//! - rendered with the default and the full listing configuration

extern crate classscope;

#[path = "../src/test/builder.rs"]
mod builder;

use builder::{u2s, ClassBuilder};
use classscope::{disassemble_with, disassembler::decode_code, ClassFile, DisassemblyConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const METHODS: usize = 200;

/// `iload_0; tableswitch 0..=3` followed by five constant returns.
fn switch_code() -> Vec<u8> {
    let mut code = vec![0x1A, 0xAA, 0, 0];
    for value in [39_i32, 0, 3, 31, 33, 35, 37] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    code.extend_from_slice(&[0x03, 0xAC, 0x04, 0xAC, 0x05, 0xAC, 0x06, 0xAC, 0x02, 0xAC]);
    code
}

fn large_class() -> Vec<u8> {
    let mut class = ClassBuilder::new("bench/Large");
    let println = class
        .pool
        .method_ref("java/io/PrintStream", "println", "(I)V");
    let [println_high, println_low] = println.to_be_bytes();

    for index in 0..METHODS {
        let lines = class.attribute("LineNumberTable", &u2s(&[1, 0, index as u16 + 1]));
        let code = class.code(2, 1, &switch_code(), &[], &[lines]);
        class.method(0x0009, &format!("method{index}"), "(I)I", &[code]);

        let print_code = class.code(
            2,
            2,
            &[0x2B, 0x1A, 0xB6, println_high, println_low, 0xB1],
            &[],
            &[],
        );
        class.method(
            0x0009,
            &format!("print{index}"),
            "(ILjava/io/PrintStream;)V",
            &[print_code],
        );
    }

    let source = class.pool.utf8("Large.java");
    let source_file = class.attribute("SourceFile", &u2s(&[source]));
    class.class_attribute(source_file);
    class.build()
}

/// Benchmark parsing the full class into the model.
fn bench_parse(c: &mut Criterion) {
    let data = large_class();

    c.bench_function("parse_large_class", |b| {
        b.iter(|| {
            let class = ClassFile::parse(black_box(&data)).unwrap();
            black_box(class)
        });
    });
}

/// Benchmark decoding a single code array with a padded switch.
fn bench_decode_code(c: &mut Criterion) {
    let code = switch_code();

    c.bench_function("decode_switch_code", |b| {
        b.iter(|| {
            let instructions = decode_code(black_box(&code)).unwrap();
            black_box(instructions)
        });
    });
}

/// Benchmark the default listing.
fn bench_listing_default(c: &mut Criterion) {
    let data = large_class();
    let config = DisassemblyConfig::default();

    c.bench_function("listing_default", |b| {
        b.iter(|| {
            let text = disassemble_with(black_box(&data), &config).unwrap();
            black_box(text)
        });
    });
}

/// Benchmark the listing with constant pool table, hash and frames.
fn bench_listing_full(c: &mut Criterion) {
    let data = large_class();
    let config = DisassemblyConfig::full();

    c.bench_function("listing_full", |b| {
        b.iter(|| {
            let text = disassemble_with(black_box(&data), &config).unwrap();
            black_box(text)
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_decode_code,
    bench_listing_default,
    bench_listing_full
);
criterion_main!(benches);
