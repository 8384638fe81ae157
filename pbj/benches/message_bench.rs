//! Benchmarks for message construction and encoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pbj::prelude::*;
use pbj::testing::{EmailMessage, NestedMessage, PROVIDER};

fn sample() -> Message {
    let mut email = EmailMessage::with_sender("homer@thesimpsons.com").expect("fixture builds");
    let mut nested = NestedMessage::create().expect("fixture builds");
    nested
        .set_single_value("test1", "val1")
        .and_then(|n| n.add_values_to_set("test2", [1, 2, 3]))
        .expect("nested values are valid");
    email
        .set_single_value("subject", "donuts")
        .and_then(|m| m.add_values_to_set("labels", ["chicken", "donuts", "Chicken"]))
        .and_then(|m| m.add_values_to_list("enum_in_list", PROVIDER.values()))
        .and_then(|m| m.set_single_value("nested", nested))
        .expect("sample values are valid");
    email
}

fn message_benchmark(c: &mut Criterion) {
    let email = sample();
    let plain = email.to_plain().expect("sample encodes");
    let serializer = JsonSerializer::default();
    let text = serializer.serialize(&email).expect("sample serializes");
    let resolver = MessageResolver::new();
    resolver.register_schema::<EmailMessage>().expect("fixture registers");

    c.bench_function("to_plain", |b| b.iter(|| black_box(&email).to_plain()));
    c.bench_function("from_plain", |b| b.iter(|| EmailMessage::from_plain(black_box(&plain))));
    c.bench_function("json_round_trip", |b| {
        b.iter(|| {
            let text = serializer.serialize(black_box(&email)).expect("serializes");
            serializer.deserialize(&text, &resolver)
        });
    });
    c.bench_function("deserialize", |b| {
        b.iter(|| serializer.deserialize(black_box(&text), &resolver));
    });
    c.bench_function("deep_clone_and_freeze", |b| {
        b.iter(|| {
            let mut copy = black_box(&email).deep_clone();
            copy.freeze();
            copy
        });
    });
}

criterion_group!(benches, message_benchmark);
criterion_main!(benches);
