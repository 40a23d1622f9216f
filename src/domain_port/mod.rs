// store

mod token_store;

pub use token_store::*;

// backend

mod kv_backend;

pub use kv_backend::*;
