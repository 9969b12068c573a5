use crate::engine::pool::{Pool, Reusable};

#[derive(Debug, Default)]
struct Scratch {
    data: Vec<u8>,
    uses: usize,
}

impl Reusable for Scratch {
    fn reset(&mut self) {
        self.data.clear();
    }
}

#[test]
fn returned_values_are_reset_but_keep_capacity() {
    let pool: Pool<Scratch> = Pool::new(4);

    let mut item = pool.get();
    item.data.extend_from_slice(&[1u8; 128]);
    item.uses += 1;
    pool.put(item);
    assert_eq!(pool.idle(), 1);

    let item = pool.get();
    assert!(item.data.is_empty());
    assert!(item.data.capacity() >= 128);
    assert_eq!(item.uses, 1, "the same instance is handed out again");
    assert_eq!(pool.idle(), 0);
}

#[test]
fn idle_values_are_capped() {
    let pool: Pool<Vec<u8>> = Pool::new(2);
    for _ in 0..5 {
        pool.put(vec![7u8; 16]);
    }
    assert_eq!(pool.idle(), 2);
    assert!(pool.get().is_empty());
}

#[test]
fn empty_pool_hands_out_defaults() {
    let pool: Pool<Vec<u8>> = Pool::default();
    assert!(pool.get().is_empty());
}
