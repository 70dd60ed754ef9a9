//! Investment analysis for a single rental property and for buildings split
//! into several units that share costs and one mortgage.

pub mod multi_unit;
pub mod single;
