//! Benchmarks for property tree operations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use propsheet_rs::model::{names, property_type, PropertyId, PropertyTree};

/// Group of `width` float leaves nested `depth` groups deep.
fn nested_sheet(width: usize, depth: usize) -> (PropertyTree, PropertyId, PropertyId) {
    let mut tree = PropertyTree::new();
    let root = tree.create(property_type::GROUP, "root");
    let mut parent = root;
    for level in 0..depth {
        let group = tree.create(property_type::GROUP, &format!("level{}", level));
        tree.add_child(parent, group);
        parent = group;
    }
    let mut last = root;
    for i in 0..width {
        let leaf = tree.create(property_type::FLOAT, &format!("leaf{}", i));
        tree.add_child(parent, leaf);
        last = leaf;
    }
    (tree, root, last)
}

fn bench_set_value_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_value_propagation");

    for depth in [1, 8, 32].iter() {
        let (mut tree, root, leaf) = nested_sheet(16, *depth);
        tree.observe(root, |_, _, event| {
            black_box(event);
        });

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, _| {
            let mut i = 0u64;
            b.iter(|| {
                tree.set_value(leaf, black_box(i as f64));
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_find_child(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_child");

    for width in [16, 256, 4096].iter() {
        let (tree, root, _) = nested_sheet(*width, 4);
        let name = format!("leaf{}", width - 1);

        group.bench_with_input(BenchmarkId::new("last_leaf", width), &name, |b, name| {
            b.iter(|| black_box(tree.find_child(root, name)));
        });
    }

    group.finish();
}

fn bench_list_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_assignment");

    for size in [4, 64, 512].iter() {
        let mut tree = PropertyTree::new();
        let list = tree.create(property_type::LIST, "values");
        for i in 0..*size {
            let child = tree.create(property_type::FLOAT, &i.to_string());
            tree.add_child(list, child);
        }

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("set_list", size), size, |b, &size| {
            let mut offset = 0.0;
            b.iter(|| {
                let values: Vec<f64> = (0..size).map(|i| i as f64 + offset).collect();
                tree.set_value(list, values);
                offset += 1.0;
            });
        });
    }

    group.finish();
}

fn bench_dynamic_list_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_list_resize");

    for size in [8, 128].iter() {
        group.bench_with_input(BenchmarkId::new("grow_shrink", size), size, |b, &size| {
            let mut tree = PropertyTree::new();
            let list = tree.create(property_type::DYNAMIC_LIST, "items");
            tree.set_attribute(list, names::VALUE_TYPE, property_type::INT);
            b.iter(|| {
                tree.set_length(list, size as i64);
                tree.set_length(list, 0);
            });
        });
    }

    group.finish();
}

fn bench_value_string(c: &mut Criterion) {
    let mut tree = PropertyTree::new();
    let list = tree.create(property_type::LIST, "geometry");
    for axis in ["x", "y", "width", "height"] {
        let child = tree.create(property_type::FLOAT, axis);
        tree.add_child(list, child);
    }
    tree.set_value(list, vec![8.0, 9.0, 200.0, 100.0]);

    c.bench_function("value_string_list", |b| {
        b.iter(|| black_box(tree.value_string(list)));
    });
}

criterion_group!(
    benches,
    bench_set_value_propagation,
    bench_find_child,
    bench_list_assignment,
    bench_dynamic_list_resize,
    bench_value_string,
);

criterion_main!(benches);
