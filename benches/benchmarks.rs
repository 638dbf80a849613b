use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use postboard::{search_posts, HackerPostGenerator, Post, PostGenerator, PostStore};

fn board(count: usize) -> Vec<Post> {
    HackerPostGenerator::seeded(7).generate_many(count)
}

fn generate_benchmark(c: &mut Criterion) {
    let mut generator = HackerPostGenerator::seeded(1);

    c.bench_function("generate_post", |b| {
        b.iter(|| black_box(generator.generate()));
    });
}

fn search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_posts");

    for count in [30, 300, 3000].iter() {
        let posts = board(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &posts, |b, posts| {
            b.iter(|| black_box(search_posts(posts, black_box("matrix"))));
        });
    }
    group.finish();
}

fn memoized_read_benchmark(c: &mut Criterion) {
    let store = PostStore::from_posts(board(300));
    store.set_filter("matrix");

    c.bench_function("filtered_posts_cached", |b| {
        b.iter(|| store.with_filtered_posts(|posts| black_box(posts.len())));
    });
}

fn add_benchmark(c: &mut Criterion) {
    let store = PostStore::from_posts(board(30));
    store.set_filter("bus");
    let post = Post::new("Virtual bus", "We need to index the SMTP array!");

    c.bench_function("add_and_read", |b| {
        b.iter(|| {
            store.add(black_box(post.clone()));
            black_box(store.with_filtered_posts(|posts| posts.len()));
        });
    });
}

fn subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_filter_with_subscribers");

    for subscriber_count in [1, 10, 100].iter() {
        let store = PostStore::from_posts(board(30));
        let subscriptions: Vec<_> = (0..*subscriber_count)
            .map(|_| store.subscribe(|posts| {
                black_box(posts.len());
            }))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0usize;
                b.iter(|| {
                    store.set_filter(if i % 2 == 0 { "bus" } else { "" });
                    i += 1;
                });
            },
        );
        drop(subscriptions);
    }
    group.finish();
}

criterion_group!(
    benches,
    generate_benchmark,
    search_benchmark,
    memoized_read_benchmark,
    add_benchmark,
    subscribe_benchmark,
);
criterion_main!(benches);
