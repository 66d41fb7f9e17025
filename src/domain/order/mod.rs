// ============================================================================
// Order Domain
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderStatus, Customer, Product)
// - Model (Order record, create/update payloads)
// - Errors (OrderError enum)
// - Aggregator (read-time enrichment from the directory and cart services)
// - Dispatcher (shipping and notification fan-out)
//
// ============================================================================

pub mod value_objects;
pub mod model;
pub mod errors;
pub mod aggregator;
pub mod dispatcher;

// Re-export for convenience
pub use value_objects::*;
pub use model::*;
pub use errors::*;
pub use aggregator::*;
pub use dispatcher::*;
