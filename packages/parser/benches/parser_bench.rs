use apiforge_parser::{parse, serialize, Format};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn large_source(paths: usize) -> String {
    let mut source = String::from("openapi: 3.0.3\ninfo:\n  title: Bench\n  version: '1'\npaths:\n");
    for i in 0..paths {
        source.push_str(&format!(
            "  /resource{i}/{{id}}:\n    get:\n      operationId: getResource{i}\n      responses:\n        200:\n          description: ok\n    delete:\n      summary: Remove resource {i}\n      responses:\n        204:\n          description: gone\n"
        ));
    }
    source.push_str("components:\n  schemas:\n");
    for i in 0..paths {
        source.push_str(&format!("    Resource{i}:\n      type: object\n"));
    }
    source
}

fn parse_yaml(c: &mut Criterion) {
    let source = large_source(200);
    c.bench_function("parse_yaml_200_paths", |b| b.iter(|| parse(black_box(&source))));
}

fn serialize_both(c: &mut Criterion) {
    let document = parse(&large_source(200)).unwrap().document;
    c.bench_function("serialize_json_200_paths", |b| {
        b.iter(|| serialize(black_box(&document), Format::Json))
    });
    c.bench_function("serialize_yaml_200_paths", |b| {
        b.iter(|| serialize(black_box(&document), Format::Yaml))
    });
}

criterion_group!(benches, parse_yaml, serialize_both);
criterion_main!(benches);
