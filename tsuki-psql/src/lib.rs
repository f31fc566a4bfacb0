#[macro_use]
extern crate tracing;

pub use self::{
    args::SqlArg,
    database::{Database, PoolConfig},
    error::DatabaseError,
    runner::PoolRunner,
};

mod args;
mod database;
mod error;
mod runner;
mod schema;
