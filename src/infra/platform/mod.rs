// Outbound calls to the chat platform that are not part of the gateway
// connection itself.

pub mod gateway_probe;

pub use gateway_probe::GatewayProbe;
