//! Typed configuration lookup.
//!
//! Missing or unparsable values fall back to the caller's default;
//! `config_validation` rejects present-but-bad values up front.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
