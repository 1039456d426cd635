use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_scan::{Candidate, Debouncer, ScanConfig, ScanSession};

/// Decoder-like stream: bursts of identical reads with misreads in between
fn decode_stream(len: usize) -> Vec<String> {
    let mut stream = Vec::with_capacity(len);
    for i in 0..len {
        let code = match i % 7 {
            0 => "12345".to_string(),
            1 | 2 | 3 => format!("{:013}", i / 7),
            _ => format!("{:08}", i / 7),
        };
        stream.push(code);
    }
    stream
}

fn bench_debouncer_feed(c: &mut Criterion) {
    let stream = decode_stream(10_000);
    let config = ScanConfig::default();
    c.bench_function("debouncer_feed_10k", |b| {
        b.iter(|| {
            let mut debouncer = Debouncer::new();
            for text in &stream {
                black_box(debouncer.feed(Candidate::new(text), &config));
            }
        })
    });
}

fn bench_session_submit(c: &mut Criterion) {
    let stream = decode_stream(10_000);
    c.bench_function("session_submit_10k", |b| {
        b.iter(|| {
            let mut session = ScanSession::default();
            for text in &stream {
                black_box(session.submit(text));
            }
            session.codes().len()
        })
    });
}

criterion_group!(benches, bench_debouncer_feed, bench_session_submit);
criterion_main!(benches);
