pub mod logger;
pub mod settings;

pub mod bootstrap;

pub mod application_impl;
pub mod domain_model;
pub mod domain_port;
pub mod infra_memory;
pub mod infra_redis;
