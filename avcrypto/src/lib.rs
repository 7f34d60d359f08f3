#[macro_use]
extern crate serde;

mod av_crypto;
mod ballot;
mod curve;
mod decryption;
mod dlog_proof;
pub mod ecies;
mod election;
mod elgamal;
mod error;
mod pedersen;
mod point_encoding;
mod schnorr;
mod selection_encoding;
mod short_code;
mod signed;
mod symmetric;
mod util;
mod validation;
mod vote;

pub use av_crypto::*;
pub use ballot::*;
pub use curve::*;
pub use decryption::*;
pub use dlog_proof::*;
pub use election::*;
pub use elgamal::*;
pub use error::*;
pub use pedersen::*;
pub use point_encoding::*;
pub use schnorr::*;
pub use selection_encoding::*;
pub use short_code::*;
pub use signed::*;
pub use symmetric::*;
pub use util::*;
pub use validation::*;
pub use vote::*;
