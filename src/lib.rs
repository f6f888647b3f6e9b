//! Browse Brazilian federal deputies and their social-media engagement.
//!
//! The library holds everything that does not draw pixels: CSV ingestion
//! and normalization, the filter / top-N pipeline, CSV export, the table
//! cache, startup configuration and the open-data API client. The desktop
//! front-end lives in the `deputy-viewer` binary.

pub mod api;
pub mod config;
pub mod data;
