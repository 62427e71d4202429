//! Navigators and caches shared between threads

mod common;

use std::sync::Arc;
use std::thread;

use common::{ada, person_schema};
use objpath::{AccessorCache, FunctionRegistry, Navigator, PathCache, Value};

const THREADS: usize = 8;
const ITERATIONS: usize = 200;

#[test]
fn test_shared_navigator_reads_from_many_threads() {
    let navigator = Arc::new(
        Navigator::builder()
            .functions(FunctionRegistry::with_standard_functions())
            .build(),
    );
    let root = ada();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let navigator = Arc::clone(&navigator);
            let root = &root;
            scope.spawn(move || {
                for _ in 0..ITERATIONS {
                    assert_eq!(navigator.get(root, "tags[1]").unwrap(), Value::from("y"));
                    assert_eq!(navigator.get(root, "tags.size()").unwrap(), Value::Integer(2));
                    assert!(!navigator.exists(root, "address.city").unwrap());
                }
            });
        }
    });

    let paths = navigator.path_cache().stats();
    assert_eq!(paths.entries, 3);
    assert_eq!(paths.hits + paths.misses, (THREADS * ITERATIONS * 3) as u64);

    // the null address is never resolved against
    let accessors = navigator.accessor_cache().stats();
    assert_eq!(accessors.types, 2);
    assert_eq!(accessors.descriptors, 3);
}

#[test]
fn test_each_thread_writes_its_own_root() {
    let navigator = Navigator::new();

    let results: Vec<Value> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|n| {
                let navigator = &navigator;
                scope.spawn(move || {
                    let mut root = ada();
                    let age = i64::try_from(n).unwrap();
                    navigator.set(&mut root, "age", age).unwrap();
                    navigator.get(&root, "age").unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let expected: Vec<Value> = (0..THREADS as i64).map(Value::Integer).collect();
    assert_eq!(results, expected);
}

#[test]
fn test_navigators_share_caches() {
    let accessors = Arc::new(AccessorCache::new());
    let paths = Arc::new(PathCache::new());
    let first = Navigator::builder()
        .accessor_cache(Arc::clone(&accessors))
        .path_cache(Arc::clone(&paths))
        .build();
    let second = Navigator::builder()
        .accessor_cache(Arc::clone(&accessors))
        .path_cache(Arc::clone(&paths))
        .build();

    let root = person_schema().instantiate().with("name", "Ada").into_value();
    assert_eq!(first.get(&root, "name").unwrap(), Value::from("Ada"));
    let misses = accessors.stats().misses;

    assert_eq!(second.get(&root, "name").unwrap(), Value::from("Ada"));
    assert_eq!(accessors.stats().misses, misses);
    assert_eq!(paths.stats().hits, 1);
}
