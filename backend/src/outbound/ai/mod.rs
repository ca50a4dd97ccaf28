//! AI endpoint adapters.

mod http_gateway;

pub use http_gateway::HttpAiGateway;
