pub use self::{board::*, line_clear::*, piece::*};

pub(crate) mod board;
pub(crate) mod line_clear;
pub(crate) mod piece;
