// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// The order is the only locally-owned entity. Customers and products belong
// to collaborator services and only appear here as read-side value objects.
//
// ============================================================================

pub mod order;
