mod code;
mod random;
mod spawn;

pub mod constants;
pub mod datetime;

pub use self::{
    code::{parse_code, with_block},
    random::{random_color, randomize, randomize_genres},
    spawn::spawn,
};
