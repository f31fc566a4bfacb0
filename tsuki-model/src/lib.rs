mod deser;
mod github;
mod hash;

pub use self::{github::*, hash::HashView};
