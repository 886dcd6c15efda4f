pub mod address;
pub mod clock;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod emulator;
pub mod genesis;
pub mod hash;
pub mod mempool;
pub mod params;
pub mod provider;
pub mod transaction;
pub mod tx_builder;
pub mod utxo_set;
pub mod validation;
pub mod value;

pub use self::{
    address::*, clock::*, codec::*, config::*, diagnostics::*, emulator::*, hash::*, mempool::*,
    params::*, provider::*, transaction::*, tx_builder::*, utxo_set::*, validation::*, value::*,
};
