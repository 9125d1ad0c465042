//! Redis adapter for the KV store port.

mod kv;

pub use kv::RedisKvStore;
