//! Upstream data API clients

pub mod fund;
pub mod polygon;

pub use fund::FundApiClient;
pub use polygon::PolygonClient;
