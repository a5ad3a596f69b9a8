use std::hint::black_box;
use std::io::Cursor;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use framegt::ground_truth::LabelMapping;
use framegt::ground_truth::loader::parse_annotation;
use framegt::ground_truth::smoothing::fill_zero_boundaries;

const FRAME_COUNT: usize = 20_000;
const LABELS: [&str; 6] = [
    "SIL",
    "take_cup",
    "pour_coffee",
    "pour_milk",
    "stir_coffee",
    "spoon_sugar",
];

fn mapping() -> LabelMapping {
    let text = LABELS
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("{idx} {name}\n"))
        .collect::<String>();
    LabelMapping::from_reader(Cursor::new(text), Path::new("mapping.txt"), false).expect("mapping")
}

fn annotation_body() -> String {
    (0..FRAME_COUNT)
        .map(|frame| format!("{}\n", LABELS[(frame / 500) % LABELS.len()]))
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mapping = mapping();
    let body = annotation_body();
    c.bench_with_input(
        BenchmarkId::new("parse_annotation", FRAME_COUNT),
        &body,
        |b, body| {
            b.iter(|| {
                parse_annotation(Cursor::new(black_box(body.as_bytes())), &mapping)
                    .expect("parse")
            })
        },
    );
}

fn bench_smooth(c: &mut Criterion) {
    let mut labels = vec![0i64; FRAME_COUNT];
    labels[FRAME_COUNT / 2] = 3;
    c.bench_function("fill_zero_boundaries", |b| {
        b.iter(|| {
            let mut copy = labels.clone();
            fill_zero_boundaries(black_box(&mut copy));
            copy
        })
    });
}

criterion_group!(benches, bench_parse, bench_smooth);
criterion_main!(benches);
