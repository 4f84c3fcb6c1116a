pub mod events;
pub mod factory;
pub mod memory;
pub mod sns;

#[derive(Debug, PartialEq)]
pub enum GatewayPublisherVia {
    Sns,
    Memory,
}
