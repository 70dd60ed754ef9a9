//! Portuguese property taxes: transfer tax (IMT), municipal property tax
//! (IMI) and rental income tax (IRS). Every function is a pure computation
//! returning a result with an explanation string.

pub mod imi;
pub mod imt;
pub mod irs;
pub mod summary;
