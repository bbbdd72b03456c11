use shardflow::ShardQueue;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn items_come_out_fifo() {
    let queue = ShardQueue::with_capacity(8);
    for i in 0..5 {
        queue.push(i).unwrap();
    }
    queue.close();

    let drained: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(drained, vec![0, 1, 2, 3, 4]);
}

#[test]
fn pop_drains_remaining_items_after_close() {
    let queue = ShardQueue::with_capacity(4);
    queue.push("a").unwrap();
    queue.push("b").unwrap();
    queue.close();

    assert_eq!(queue.pop(), Some("a"));
    assert_eq!(queue.pop(), Some("b"));
    assert_eq!(queue.pop(), None);
    assert_eq!(queue.pop(), None);
}

#[test]
fn close_is_idempotent() {
    let queue = ShardQueue::<u32>::with_capacity(4);
    queue.close();
    queue.close();
    assert!(queue.is_closed());
    assert_eq!(queue.pop(), None);
}

#[test]
fn push_after_close_returns_the_item() {
    let queue = ShardQueue::with_capacity(4);
    queue.close();
    assert_eq!(queue.push(7), Err(7));
}

#[test]
fn capacity_has_a_minimum_of_one() {
    let queue = ShardQueue::<u8>::with_capacity(0);
    assert_eq!(queue.capacity(), 1);
}

#[test]
fn full_queue_blocks_the_producer_until_a_pop() {
    let queue = Arc::new(ShardQueue::with_capacity(1));
    queue.push(1u32).unwrap();

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.push(2).unwrap())
    };

    // Give the producer time to block on the full queue.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(queue.len(), 1, "producer should still be blocked");

    assert_eq!(queue.pop(), Some(1));
    producer.join().unwrap();
    assert_eq!(queue.pop(), Some(2));
}

#[test]
fn close_wakes_a_blocked_consumer() {
    let queue = Arc::new(ShardQueue::<u32>::with_capacity(4));

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop())
    };

    thread::sleep(Duration::from_millis(50));
    queue.close();
    assert_eq!(consumer.join().unwrap(), None);
}

#[test]
fn close_wakes_every_blocked_consumer() {
    let queue = Arc::new(ShardQueue::<u32>::with_capacity(4));

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    queue.close();
    for consumer in consumers {
        assert_eq!(consumer.join().unwrap(), None);
    }
}

#[test]
fn producer_consumer_transfers_everything_under_backpressure() {
    let queue = Arc::new(ShardQueue::with_capacity(2));
    let total = 500u32;

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut seen = Vec::new();
            while let Some(item) = queue.pop() {
                seen.push(item);
            }
            seen
        })
    };

    for i in 0..total {
        queue.push(i).unwrap();
    }
    queue.close();

    let seen = consumer.join().unwrap();
    assert_eq!(seen, (0..total).collect::<Vec<_>>());
}
