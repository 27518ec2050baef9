//! Prometheus counters for board operations, exposed at `/metrics`.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Operation {
    ListBoards,
    CreateBoard,
    SaveBoard,
    GetBoardData,
    DeleteBoard,
    SearchBoards,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Outcome {
    Ok,
    Refused,
    Error,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: Operation,
    pub outcome: Outcome,
}

pub struct Metrics {
    registry: Registry,
    operations: Family<OperationLabels, Counter>,
    unauthenticated: Counter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("whiteboard");
        let operations = Family::<OperationLabels, Counter>::default();
        let unauthenticated = Counter::default();

        registry.register(
            "board_operations",
            "Board operations by outcome",
            operations.clone(),
        );
        registry.register(
            "unauthenticated_requests",
            "Requests redirected to the login entry point",
            unauthenticated.clone(),
        );

        Self {
            registry,
            operations,
            unauthenticated,
        }
    }

    pub fn record(&self, operation: Operation, outcome: Outcome) {
        self.operations
            .get_or_create(&OperationLabels { operation, outcome })
            .inc();
    }

    pub fn record_unauthenticated(&self) {
        self.unauthenticated.inc();
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}
