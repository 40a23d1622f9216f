mod kv_backend_redis;

pub use kv_backend_redis::*;
