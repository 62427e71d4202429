use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use objpath::{ContainerFactories, Navigator, PathCache, RecordSchema, Value, ValueType, parse};

fn nested_root() -> Value {
    let address = RecordSchema::builder("Address")
        .property("city", ValueType::String)
        .property("lines", ValueType::List)
        .build();
    let customer = RecordSchema::builder("Customer")
        .property("name", ValueType::String)
        .property("addresses", ValueType::List)
        .build();
    let order = RecordSchema::builder("Order")
        .property("customer", customer.value_type())
        .build();

    let addresses = (0..4)
        .map(|n| {
            address
                .instantiate()
                .with("city", format!("City {n}"))
                .with("lines", Value::List(vec![Value::from("line 1")]))
                .into_value()
        })
        .collect::<Vec<_>>();
    let customer = customer
        .instantiate()
        .with("name", "Ada")
        .with("addresses", Value::List(addresses))
        .into_value();
    order.instantiate().with("customer", customer).into_value()
}

fn benchmark_parse(c: &mut Criterion) {
    let path = "customer.addresses[2].lines['first'].orElse('none')";

    c.bench_function("parse_uncached", |b| b.iter(|| black_box(parse(black_box(path)))));

    let cache = PathCache::new();
    c.bench_function("parse_cached", |b| {
        b.iter(|| black_box(cache.parse(black_box(path))))
    });
}

fn benchmark_get(c: &mut Criterion) {
    let navigator = Navigator::new();
    let root = nested_root();

    c.bench_function("get_nested", |b| {
        b.iter(|| black_box(navigator.get_cow(&root, black_box("customer.addresses[2].city"))))
    });

    c.bench_function("exists_missing", |b| {
        b.iter(|| black_box(navigator.exists(&root, black_box("customer.phone"))))
    });
}

fn benchmark_set(c: &mut Criterion) {
    let navigator = Navigator::new();
    let factories = ContainerFactories::new().with_builtin_containers();

    c.bench_function("set_nested", |b| {
        let mut root = nested_root();
        b.iter(|| {
            black_box(navigator.set(&mut root, black_box("customer.addresses[1].city"), "Berlin"))
        })
    });

    c.bench_function("set_creating_map", |b| {
        b.iter(|| {
            let mut root = Value::map();
            black_box(navigator.set_creating(&mut root, black_box("a"), 1, &factories))
        })
    });
}

criterion_group!(benches, benchmark_parse, benchmark_get, benchmark_set);
criterion_main!(benches);
