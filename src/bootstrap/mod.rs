mod token_store_factory;

pub use token_store_factory::*;
