//! gribrange core: fetch selected records of a GRIB2 archive using its `.idx`
//! inventory and concurrent HTTP Range requests.

pub mod config;
pub mod logging;

pub mod fetcher;
pub mod index;
pub mod job;
pub mod selector;
pub mod source;
pub mod storage;
pub mod transfer;
