//! Library side of the `sdtm` binary: ingest, CSV output and logging.

pub mod ingest;
pub mod logging;
pub mod output;
