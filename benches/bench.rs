use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strict_uri::{Options, Uri};

criterion_group!(benches, bench_parse, bench_parse_ip, bench_parse_reference, bench_reject);
criterion_main!(benches);

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        b.iter(|| {
            let s = "https://user@example.com:8042/over/there?q=%E6%B5%8B%E8%AF%95#fragment";
            black_box(Uri::parse(black_box(s)))
        })
    });
}

fn bench_parse_ip(c: &mut Criterion) {
    c.bench_function("parse_ip", |b| {
        b.iter(|| {
            let s = "http://[fe80::520f:f5ff:fe51:cf0%25en17]:8080/";
            black_box(Uri::parse(black_box(s)))
        })
    });
}

fn bench_parse_reference(c: &mut Criterion) {
    let opts = Options::new().with_reference(true);
    c.bench_function("parse_reference", |b| {
        b.iter(|| {
            let s = "//cdn.example.net/assets/app.js?v=12345";
            black_box(Uri::parse_with(black_box(s), &opts))
        })
    });
}

fn bench_reject(c: &mut Criterion) {
    c.bench_function("reject", |b| {
        b.iter(|| {
            let s = "https://spanakopita..example/dir";
            black_box(Uri::parse(black_box(s)))
        })
    });
}
