//! Cache outage behavior. These run against a local socket that accepts
//! connections and never answers, so no real Redis is needed: every command
//! trips the store's command deadline.

use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use catalog_service::cache;
use redis_store::{RedisPool, SharedConnectionManager};
use serde_json::{json, Value};

/// A connection manager talking to a socket that swallows every command.
async fn stalled_redis() -> SharedConnectionManager {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 512];
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    let pool = RedisPool::connect(&format!("redis://{addr}"))
        .await
        .expect("tcp connect");
    pool.manager()
}

#[tokio::test]
async fn read_path_degrades_to_the_computed_payload() {
    let redis = stalled_redis().await;
    let key = "vstream:cache:video:outage-read";
    let started = Instant::now();

    // Lookup fails inside the store, reads as a miss.
    let cached: Option<Value> = cache::lookup(&redis, key).await;
    assert!(cached.is_none());

    // The handler path falls through to the source of truth.
    let computed = json!({ "id": "outage-read", "views": 3 });
    let served = cached.unwrap_or_else(|| computed.clone());
    assert_eq!(served, computed);

    // The post-compute store also fails quietly.
    cache::store(&redis, key, &computed, 60).await;

    assert!(
        started.elapsed() < Duration::from_secs(3),
        "a dead cache must fail the command deadline, not hang the request"
    );
}

#[tokio::test]
async fn mutation_invalidation_surfaces_the_outage() {
    let redis = stalled_redis().await;

    // Write paths must not acknowledge with the point entry possibly stale.
    let result = cache::invalidate(&redis, "vstream:cache:video:outage-write").await;
    assert!(result.is_err());
}
