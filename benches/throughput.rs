//! Throughput Benchmark for FlashJSON
//!
//! Measures the client-side cost of a command: encoding the request,
//! serializing it to wire bytes, and parsing + decoding the reply.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flashjson::json::{command, reply};
use flashjson::protocol::parse_reply;
use flashjson::{GetOptions, SetMode};

const DOC: &str = r#"{"name":"Leonard Cohen","lastSeen":1478476800,"loggedOut":true}"#;

/// Benchmark request encoding
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        b.iter(|| {
            let cmd = command::set(black_box("obj"), ".", black_box(DOC), SetMode::IfAbsent);
            black_box(cmd.into_resp().serialize());
        });
    });

    let large = format!("[{}]", vec![DOC; 1024].join(","));
    group.bench_function("set_large", |b| {
        b.iter(|| {
            let cmd = command::set("obj", ".", black_box(&large), SetMode::Always);
            black_box(cmd.into_resp().serialize());
        });
    });

    let options = GetOptions::builder()
        .indent("  ")
        .newline("\n")
        .space(" ")
        .no_escape(true)
        .build();
    group.bench_function("get_with_options", |b| {
        b.iter(|| {
            let cmd = command::get("obj", black_box(&options), &[".name", ".loggedOut"]);
            black_box(cmd.into_resp().serialize());
        });
    });

    let keys: Vec<String> = (0..100).map(|i| format!("doc:{}", i)).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    group.bench_function("mget_100", |b| {
        b.iter(|| {
            let cmd = command::mget(".", black_box(&key_refs));
            black_box(cmd.into_resp().serialize());
        });
    });

    group.finish();
}

/// Benchmark reply parsing and decoding
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    let get_reply = format!("${}\r\n{}\r\n", DOC.len(), DOC).into_bytes();
    group.bench_function("get_document", |b| {
        b.iter(|| {
            let (value, _) = parse_reply(black_box(&get_reply)).unwrap().unwrap();
            black_box(reply::nilable_string(value).unwrap());
        });
    });

    group.bench_function("integer", |b| {
        b.iter(|| {
            let (value, _) = parse_reply(black_box(b":3\r\n")).unwrap().unwrap();
            black_box(reply::integer(value).unwrap());
        });
    });

    let keys: Vec<String> = (0..100).map(|i| format!("doc:{}", i)).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let mut mget_reply = b"*100\r\n".to_vec();
    for i in 0..100 {
        if i % 3 == 0 {
            mget_reply.extend_from_slice(b"$-1\r\n");
        } else {
            mget_reply.extend_from_slice(format!("${}\r\n{}\r\n", DOC.len(), DOC).as_bytes());
        }
    }
    group.bench_function("mget_100", |b| {
        b.iter(|| {
            let (value, _) = parse_reply(black_box(&mget_reply)).unwrap().unwrap();
            black_box(reply::key_values(&key_refs, value).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
