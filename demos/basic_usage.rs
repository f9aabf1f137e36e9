//! A tour of `ThreadedMap`: insertion, lookup, bounds, positions and cursors.
//!
//! Run with `cargo run --example basic_usage`.

use threaded_map::{threaded_map, NaturalOrder, NodePool, ReverseOrder, ThreadedMap};

fn main() {
    let mut scores = ThreadedMap::new();
    for (name, score) in [("mallory", 71), ("alice", 93), ("eve", 58), ("bob", 88), ("carol", 64)] {
        scores.insert(name, score);
    }

    println!("All scores in name order:");
    for (name, score) in &scores {
        println!("  {name:<8} {score}");
    }

    // A duplicate key reports the existing element and changes nothing.
    let (pos, inserted) = scores.insert("alice", 0);
    println!("\nre-insert alice: inserted={inserted}, stored={:?}", scores.get_at(pos));

    // Names from "b" up to, but excluding, "e".
    let first = scores.lower_bound("b");
    let last = scores.lower_bound("e");
    let mut pos = first;
    print!("\nNames in [b, e):");
    while pos != last {
        print!(" {}", scores.key_at(pos).copied().unwrap_or_default());
        pos = scores.next(pos);
    }
    println!();

    // Stepping back from the sentinel reaches the largest key.
    println!("last name: {:?}", scores.key_at(scores.prev(scores.end())));

    // Cursors can edit values and erase as they go.
    let mut cursor = scores.cursor_front_mut();
    while let Some((_, &score)) = cursor.get() {
        if score < 60 {
            cursor.remove_current();
        } else {
            if let Some(score) = cursor.value_mut() {
                *score += 2;
            }
            cursor.move_next();
        }
    }
    println!("\nAfter curving and dropping failures: {scores:?}");

    // `get_or_insert_default` always leaves the key behind.
    *scores.get_or_insert_default("trent") += 75;
    println!("trent: {}", scores["trent"]);

    // A custom order.
    let mut countdown = ThreadedMap::with_comparator(ReverseOrder);
    countdown.extend((1..=5).map(|n| (n, n * n)));
    println!("\nDescending: {:?}", countdown.keys().collect::<Vec<_>>());

    // A bounded pool turns exhaustion into an error instead of an abort.
    let mut small = ThreadedMap::with_comparator_in(NaturalOrder, NodePool::with_limit(2));
    for k in 0..3 {
        match small.try_insert(k, ()) {
            Ok(_) => println!("stored {k}"),
            Err(err) => println!("could not store {k}: {err}"),
        }
    }

    let literal = threaded_map! { 3 => 'c', 1 => 'a', 2 => 'b' };
    println!("\nliteral: {literal:?}");
    if let Err(err) = literal.check_invariants() {
        eprintln!("structure check failed: {err}");
    }
}
