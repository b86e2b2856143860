//! Blends league, home-team and guest-team historical probabilities into a
//! single betting probability for a matchup.

pub mod analysis;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod interactive;
