use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref DISCOVERY_CYCLES_TOTAL: IntCounter = IntCounter::new(
        "flink_dashboard_discovery_cycles_total",
        "Total number of job discovery cycles started."
    )
    .unwrap();
    pub static ref NAMESPACE_ERRORS_TOTAL: IntCounter = IntCounter::new(
        "flink_dashboard_namespace_errors_total",
        "Total number of per-namespace list failures."
    )
    .unwrap();
    pub static ref CACHE_HITS_TOTAL: IntCounter = IntCounter::new(
        "flink_dashboard_cache_hits_total",
        "Total number of job list requests served from the cache."
    )
    .unwrap();
    pub static ref CACHE_REFRESHES_TOTAL: IntCounter = IntCounter::new(
        "flink_dashboard_cache_refreshes_total",
        "Total number of successful cache refreshes."
    )
    .unwrap();
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(DISCOVERY_CYCLES_TOTAL.clone()))
        .expect("Failed to register DISCOVERY_CYCLES_TOTAL");
    REGISTRY
        .register(Box::new(NAMESPACE_ERRORS_TOTAL.clone()))
        .expect("Failed to register NAMESPACE_ERRORS_TOTAL");
    REGISTRY
        .register(Box::new(CACHE_HITS_TOTAL.clone()))
        .expect("Failed to register CACHE_HITS_TOTAL");
    REGISTRY
        .register(Box::new(CACHE_REFRESHES_TOTAL.clone()))
        .expect("Failed to register CACHE_REFRESHES_TOTAL");
}

pub fn gather_metrics() -> String {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}
