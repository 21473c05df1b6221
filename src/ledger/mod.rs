pub mod memory;
pub mod resolver;
pub mod sinks;
pub mod snapshot;

use std::sync::Arc;

pub use memory::InMemoryLedger;
pub use resolver::{DEFAULT_ADDRESS_PREFIX, HexAddressResolver};
pub use sinks::{RecordingEventSink, TracingEventSink};
pub use snapshot::{AccountBalance, LedgerSnapshot, ModuleBalance};

use crate::settlement::{EventSinkPort, LedgerPorts};

/// Wires one in-memory ledger into every store, bank and validator port.
pub fn in_memory_ports(
    ledger: Arc<InMemoryLedger>,
    resolver: HexAddressResolver,
    events: Arc<dyn EventSinkPort>,
) -> LedgerPorts {
    LedgerPorts {
        contracts: ledger.clone(),
        bank: ledger.clone(),
        validators: ledger,
        addresses: Arc::new(resolver),
        events,
    }
}
