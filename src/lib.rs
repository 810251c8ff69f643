//! Context-mixing bitwise predictor.
//!
//! Before each bit of a stream, [`Predictor::p`] gives a 12-bit probability
//! (0 to 4095) that the bit is 1; after the bit is known,
//! [`Predictor::update`] trains the whole ensemble on it. An arithmetic
//! coder drives the loop:
//!
//! ```no_run
//! use paqmix::Predictor;
//!
//! let mut predictor = Predictor::new();
//! # let bits = [0, 1, 1, 0];
//! for bit in bits {
//!     let _p = predictor.p(); // feed to the coder
//!     predictor.update(bit);  // realized bit comes back
//! }
//! ```
//!
//! Internally an ensemble of context models (bit-history maps, run models)
//! pushes stretched predictions into a logistic [`mixer::Mixer`], whose
//! output is refined by a cascade of adaptive probability maps
//! ([`apm::Apm`]). Every component trains online after every bit. The
//! component types are public so that specialized models (see
//! [`pic_model::PicModel`] and [`match_model::MatchModel`]) can be
//! assembled into custom ensembles.

pub mod apm;
pub mod config;
pub mod context;
pub mod context_map;
pub mod context_model;
pub mod error;
pub mod hash_table;
pub mod ilog;
pub mod logistic;
pub mod match_model;
pub mod mixer;
pub mod pic_model;
pub mod predictor;
pub mod random;
pub mod run_map;
pub mod state_table;
pub mod statemap;
pub mod stationary_map;

pub use crate::{
    config::Config,
    error::ConfigError,
    predictor::Predictor,
};
