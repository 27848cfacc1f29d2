//! integrated tests
pub mod toolkit;

mod index;

#[cfg(feature = "flate2")]
mod production;


#[cfg(feature = "serde")]
mod serdes;
