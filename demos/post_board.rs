//! Walk-through of a PostStore: seeding, searching, adding and clearing.
//!
//! Run with `RUST_LOG=postboard=debug` to see the store's log events, and
//! optionally pass a TOML config path as the first argument.

use postboard::{Post, PostStore, StoreConfig};

fn main() -> postboard::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Post Board ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::default().with_seed(2024),
    };
    let store = PostStore::with_config(&config);

    println!("1. Seeded {} posts, showing the first three:", store.len());
    store.with_filtered_posts(|posts| {
        for post in posts.iter().take(3) {
            println!("   {} - {}", post.title, post.body);
        }
    });

    println!("\n2. Subscribing to the filtered view");
    let _subscription = store.subscribe({
        let store = store.clone();
        move |posts| {
            println!(
                "   [Board Update] {} of {} posts match {:?}",
                posts.len(),
                store.len(),
                store.filter()
            );
        }
    });

    println!("\n3. Adding a post");
    store.add(Post::new("Neural Matrix", "Bypass the firewall!"));

    println!("\n4. Searching for \"matrix\"");
    store.set_filter("matrix");
    store.with_filtered_posts(|posts| {
        for post in posts {
            println!("   {} - {}", post.title, post.body);
        }
    });

    println!("\n5. Searching for \"xyz\"");
    store.set_filter("xyz");

    println!("\n6. Clearing the search and the board");
    store.set_filter("");
    store.clear();

    println!("\n✓ Example complete!");
    Ok(())
}
