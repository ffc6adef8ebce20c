//! Download orchestration services.
//!
//! - `pool`: fixed-size worker pools used at both fan-out points
//! - `download`: one album from resolved link to file on disk
//! - `year`: one year end to end, report included

pub mod download;
pub mod pool;
pub mod year;
