/// Memoizing cache with at most one in-flight computation per key.
pub mod single_flight;
