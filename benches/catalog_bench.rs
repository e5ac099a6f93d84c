use std::{hint::black_box, time::Duration};

use book_catalog::{AvlTree, Book, Catalog};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

const BOOKS: usize = 10_000;

fn custom_criterion() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(2))
        .warm_up_time(Duration::from_secs(1))
}

fn shuffled_isbns() -> Vec<String> {
    let mut isbns: Vec<String> = (0..BOOKS).map(|n| format!("978-{n:08}")).collect();
    isbns.shuffle(&mut StdRng::seed_from_u64(7));
    isbns
}

fn catalog_of(isbns: &[String]) -> Catalog {
    let mut catalog = Catalog::new();
    for isbn in isbns {
        if let Ok(book) = Book::new(isbn.as_str(), "Title", "Author", 2000) {
            catalog.insert(book);
        }
    }
    catalog
}

fn tree_bench(c: &mut Criterion) {
    let isbns = shuffled_isbns();
    let mut sorted = isbns.clone();
    sorted.sort();

    let mut group = c.benchmark_group("AvlTree");

    group.bench_function("insert_random_10k", |b| {
        b.iter_batched(
            || isbns.clone(),
            |keys| keys.into_iter().collect::<AvlTree<String>>(),
            BatchSize::LargeInput,
        );
    });

    group.bench_function("insert_ascending_10k", |b| {
        b.iter_batched(
            || sorted.clone(),
            |keys| keys.into_iter().collect::<AvlTree<String>>(),
            BatchSize::LargeInput,
        );
    });

    let tree: AvlTree<String> = isbns.iter().cloned().collect();
    group.bench_function("lookup_hit", |b| {
        let mut keys = isbns.iter().cycle();
        b.iter(|| keys.next().map(|key| tree.get(black_box(key)).is_some()));
    });

    group.bench_function("inorder_traversal", |b| {
        b.iter(|| tree.iter().count());
    });

    group.bench_function("remove_all_random", |b| {
        b.iter_batched(
            || isbns.iter().cloned().collect::<AvlTree<String>>(),
            |mut tree| {
                for key in &isbns {
                    tree.remove(key);
                }
                tree
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn catalog_bench(c: &mut Criterion) {
    let isbns = shuffled_isbns();
    let mut group = c.benchmark_group("Catalog");

    group.bench_function("lend_and_return", |b| {
        b.iter_batched(
            || catalog_of(&isbns),
            |mut catalog| {
                for isbn in isbns.iter().step_by(10) {
                    catalog.lend(isbn);
                    catalog.give_back(isbn);
                }
                catalog
            },
            BatchSize::LargeInput,
        );
    });

    let catalog = catalog_of(&isbns);
    group.bench_function("available_listing", |b| {
        b.iter(|| catalog.available_books().count());
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = custom_criterion();
    targets = tree_bench, catalog_bench
}
criterion_main!(benches);
