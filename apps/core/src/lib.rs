pub mod catalog;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod logging;
pub mod model;
pub mod profile;
pub mod runtime;
pub mod search;
pub mod store;
pub mod transport;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
