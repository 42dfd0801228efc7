//! End-to-end pipeline tests: handler mutation through the bus to the
//! persisted activity and notification rows.

mod pipeline;
