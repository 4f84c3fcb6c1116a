use serde::{Deserialize, Serialize};
use crate::gateway::GatewayPublisherVia;

// RepositoryStore selects the backend the ledger store and card directory
// are built against. Memory backs local development and the test suite.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl RepositoryStore {
    pub fn gateway_publisher(&self) -> GatewayPublisherVia {
        match self {
            RepositoryStore::DynamoDB => { GatewayPublisherVia::Sns }
            RepositoryStore::LocalDynamoDB => { GatewayPublisherVia::Memory }
            RepositoryStore::Memory => { GatewayPublisherVia::Memory }
        }
    }
}
