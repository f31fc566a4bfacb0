#[macro_use]
extern crate tracing;

mod client;
mod error;
mod github;
mod metrics;
mod runner;
mod site;

pub use self::{
    client::Client,
    error::ClientError,
    runner::{HttpMethod, NetRunner, Payload, RequestOptions},
    site::Site,
};

static MY_USER_AGENT: &str = env!("CARGO_PKG_NAME");
