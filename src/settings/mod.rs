//! Settings come from a TOML file (see `settings/dev.toml`) with
//! `TOKENSTORE__SECTION__KEY` environment overrides.
//! See `bin/settings_demo.rs` for a binary that loads them.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
