#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::float_cmp
)]

mod ask_tell;
mod best;
mod stopping;
mod table;
mod workflow;
