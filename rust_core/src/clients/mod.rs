pub mod crash_gateway;
pub mod source;

// Re-export commonly used types
pub use crash_gateway::{CrashGatewayClient, GatewayConfig};
pub use source::CoefficientSource;
