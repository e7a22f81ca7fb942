use decfloat::{FP32, FP64};

fn test_encode() {
    for i in 1..100 {
        let v = black_box(i as f64 * 1.37e-3);
        black_box(FP32::from_f64(v).unwrap());
    }
}

fn test_decode() {
    let x = FP64::from_f64(355.0 / 113.0).unwrap();
    for _ in 0..100 {
        black_box(black_box(x).as_f64());
    }
}

fn test_add() {
    let step = FP32::from_f64(0.25).unwrap();
    let mut acc = FP32::one(false);
    for _ in 0..100 {
        acc = acc + black_box(step);
    }
    black_box(acc);
}

fn test_mul() {
    let factor = FP64::from_f64(1.0001).unwrap();
    let mut acc = FP64::one(false);
    for _ in 0..100 {
        acc = acc * black_box(factor);
    }
    black_box(acc);
}

fn test_div() {
    let divisor = FP64::from_f64(3.0).unwrap();
    let mut acc = FP64::from_f64(1e50).unwrap();
    for _ in 0..100 {
        acc = acc / black_box(divisor);
    }
    black_box(acc);
}

fn test_print_parse() {
    let x = FP64::from_f64(-123456.789).unwrap();
    for _ in 0..100 {
        let s = black_box(x).to_string();
        black_box(s.parse::<FP64>().unwrap());
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_encode", |b| b.iter(test_encode));
    c.bench_function("test_decode", |b| b.iter(test_decode));
    c.bench_function("test_add", |b| b.iter(test_add));
    c.bench_function("test_mul", |b| b.iter(test_mul));
    c.bench_function("test_div", |b| b.iter(test_div));
    c.bench_function("test_print_parse", |b| b.iter(test_print_parse));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
