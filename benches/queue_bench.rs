use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;

use blocking_queues::{CursorPosition, MessageQueue, TileDesc, TileQueue};

fn bench_fifo_put_get(c: &mut Criterion) {
    c.bench_function("fifo_put_get", |b| {
        let q = MessageQueue::new();
        b.iter(|| {
            q.put("statechanged: .uno:Bold=true");
            q.get()
        });
    });
}

fn bench_tile_put_dedup(c: &mut Criterion) {
    c.bench_function("tile_put_dedup_64_pending", |b| {
        let q = TileQueue::new();
        for i in 0..64 {
            q.put(TileDesc::new(1, 0, i * 256, 0, 256, 256).to_string());
        }
        // Each put supersedes the pending tile for the same key, so the
        // queue holds a steady 64 entries across iterations.
        b.iter(|| {
            q.put(TileDesc::new(1, 0, 0, 0, 256, 256).to_string());
        });
    });
}

fn bench_tile_priority_get(c: &mut Criterion) {
    c.bench_function("tile_priority_get_64_pending", |b| {
        let q = TileQueue::new();
        q.update_cursor_position(
            1,
            CursorPosition {
                part: 0,
                x: 0,
                y: 0,
                width: 50,
                height: 50,
            },
        );
        // 64 pending tiles nowhere near the cursor.
        for i in 0..64 {
            q.put(TileDesc::new(1, 0, (i + 1) * 1000, 1000, 256, 256).to_string());
        }
        b.iter(|| {
            q.put(TileDesc::new(1, 0, 0, 0, 256, 256).to_string());
            q.get()
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_fifo_put_get, bench_tile_put_dedup, bench_tile_priority_get
}
criterion_main!(benches);
