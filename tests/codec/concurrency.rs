//! Parallel use of the shared schema cache and buffer pool

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;
use structpack::{pack_with_options, record, BufferPool, ByteOrder, Engine, SchemaCache};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Sample {
        pub id: u32,
        pub n: u16 => "sizeof=body",
        pub body: Vec<u8>,
    }
}

fn expected(id: u32, body: &[u8]) -> Vec<u8> {
    let mut out = id.to_be_bytes().to_vec();
    out.extend_from_slice(&(body.len() as u16).to_be_bytes());
    out.extend_from_slice(body);
    out
}

#[test]
fn test_parallel_pack_on_shared_shape() {
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8u32)
        .map(|id| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..200u32 {
                    let body = vec![id as u8; (round % 17) as usize];
                    let mut value = Sample {
                        id,
                        n: 0,
                        body: body.clone(),
                    };
                    assert_eq!(packed(&mut value), expected(id, &body));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn test_order_override_does_not_leak_across_calls() {
    let cache = SchemaCache::new();
    let engine = Arc::new(Engine::with_pool(
        Box::leak(Box::new(cache)),
        BufferPool::with_limits(1024, 4),
    ));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u32)
        .map(|id| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let little = id % 2 == 1;
                let options = if little {
                    EncodingOptions::new().with_byte_order(ByteOrder::Little)
                } else {
                    EncodingOptions::new()
                };
                barrier.wait();
                for _ in 0..200 {
                    let mut value = Sample {
                        id: 1,
                        n: 0,
                        body: vec![],
                    };
                    let bytes = engine.pack_to_vec(&mut value, &options).unwrap();
                    let want: &[u8] = if little { &[1, 0, 0, 0, 0, 0] } else { &[0, 0, 0, 1, 0, 0] };
                    assert_eq!(bytes, want);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let schema = engine.cache().schema_of::<Sample>().unwrap();
    assert!(schema.iter().all(|f| f.byte_order == ByteOrder::Big));
    assert!(engine.pool().available() <= 4);
}

#[test]
fn test_global_override_keeps_default_calls_big_endian() {
    let little = EncodingOptions::new().with_byte_order(ByteOrder::Little);
    let mut value = Sample {
        id: 2,
        n: 0,
        body: vec![9],
    };

    let mut buf = Vec::new();
    pack_with_options(&mut buf, &mut value, &little).unwrap();
    assert_eq!(buf, [2, 0, 0, 0, 1, 0, 9]);
    assert_eq!(packed(&mut value), expected(2, &[9]));
}
