use chatfence_engine::{MessageBuffer, extract_code_blocks, segments};
use criterion::{Criterion, criterion_group, criterion_main};
use pulldown_cmark::Parser;

fn generate_chat_message(blocks: usize) -> String {
    let base = "Here is the next step, with some explanation of what it does.\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(blocks)
}

fn bench_full_rescan(c: &mut Criterion) {
    let mut group = c.benchmark_group("rescan");
    group.sample_size(10);

    let content = generate_chat_message(100);
    group.bench_function("segments", |b| {
        b.iter(|| std::hint::black_box(segments(std::hint::black_box(&content))));
    });
    group.bench_function("extract_code_blocks", |b| {
        b.iter(|| std::hint::black_box(extract_code_blocks(std::hint::black_box(&content))));
    });
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let events: Vec<_> = Parser::new(std::hint::black_box(&content)).collect();
            std::hint::black_box(events);
        });
    });

    group.finish();
}

/// One rescan per simulated token, the way a chat view calls the engine.
fn bench_token_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");
    group.sample_size(10);

    let content = generate_chat_message(10);
    group.bench_function("replay_8_byte_tokens", |b| {
        b.iter(|| {
            let mut buf = MessageBuffer::new();
            for chunk in content.as_bytes().chunks(8) {
                buf.push_bytes(chunk)
                    .expect("generated content is ASCII, so byte chunks are valid UTF-8");
                std::hint::black_box(buf.segments());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_full_rescan, bench_token_stream);
criterion_main!(benches);
