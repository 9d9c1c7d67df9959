use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("mistralius.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("mistralius.client.request_errors");
pub(crate) static CLIENT_TIMEOUTS: Counter = Counter::new("mistralius.client.timeouts");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("mistralius.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("mistralius.session.turns");
pub(crate) static SESSION_FAILED_TURNS: Counter = Counter::new("mistralius.session.failed_turns");

pub(crate) static IMAGES_ENCODED: Counter = Counter::new("mistralius.image.encoded");
pub(crate) static IMAGE_BYTES: Counter = Counter::new("mistralius.image.bytes");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_TIMEOUTS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_FAILED_TURNS);

    collector.register_counter(&IMAGES_ENCODED);
    collector.register_counter(&IMAGE_BYTES);
}
