mod kv_backend_memory;

pub use kv_backend_memory::*;
