use criterion::{black_box, criterion_group, criterion_main, Criterion};
use url_view::{encoding::PctStr, UrlView};

criterion_group!(benches, bench_parse, bench_decode, bench_compare, bench_params);
criterion_main!(benches);

const URL: &str =
    "https://jane%2Ddoe:pass@[2001:db8::7]:8080/over/there%20and%20back?name=ferret&color=purple#nose";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        b.iter(|| UrlView::parse(black_box(URL)).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let s = PctStr::new_or_panic("te%F0%9F%98%83a%20%E6%B5%8B1%60~!@%E8%AF%95%23$%25st%5E&+=");
    c.bench_function("decode", |b| b.iter(|| black_box(s).decode()));
}

fn bench_compare(c: &mut Criterion) {
    let a = UrlView::parse("http://example.com/%7Eted/a/b/c").unwrap();
    let b_ = UrlView::parse("HTTP://example.com/~ted/a/b/c").unwrap();
    c.bench_function("compare", |b| {
        b.iter(|| black_box(a).compare(black_box(&b_)))
    });
}

fn bench_params(c: &mut Criterion) {
    let u = UrlView::parse("/p?a=1&b=2&c=3&d=4&e=5&first=John&last=Doe").unwrap();
    c.bench_function("find_param", |b| {
        b.iter(|| u.encoded_params().find(black_box("last"), false).unwrap())
    });
}
