//! Metric names and recording helpers

use std::sync::OnceLock;

use faultline_core::Family;
use opentelemetry::{KeyValue, global, metrics::Counter};

/// Count of raised errors that reached their terminal outcome
pub const ERRORS_HANDLED: &str = "faultline.errors.handled";

/// Count of raised errors that could not be dispatched
pub const ERRORS_UNHANDLED: &str = "faultline.errors.unhandled";

struct Instruments {
    handled: Counter<u64>,
    unhandled: Counter<u64>,
}

fn instruments() -> &'static Instruments {
    static INSTRUMENTS: OnceLock<Instruments> = OnceLock::new();
    INSTRUMENTS.get_or_init(|| {
        let meter = global::meter("faultline");
        Instruments {
            handled: meter
                .u64_counter(ERRORS_HANDLED)
                .with_description("Raised errors converted into a response or close frame")
                .build(),
            unhandled: meter
                .u64_counter(ERRORS_UNHANDLED)
                .with_description("Raised errors with no usable handler")
                .build(),
        }
    })
}

/// Record a successfully handled error
pub fn record_handled(type_name: &'static str, family: Family) {
    instruments().handled.add(
        1,
        &[
            KeyValue::new("error.type", type_name),
            KeyValue::new("error.family", family.as_str()),
        ],
    );
}

/// Record an error that fell through to the host's unhandled path
pub fn record_unhandled(type_name: &'static str) {
    instruments().unhandled.add(1, &[KeyValue::new("error.type", type_name)]);
}
