pub mod logging;
mod metrics;
mod trace_id;

pub use metrics::{
    init_metrics, metrics_handler, metrics_middleware, record_inbound_sms, record_outbound_sms,
};
pub use trace_id::trace_id;
