//! Configuration source port

/// A string-keyed source of configuration values
///
/// Sources are consulted in priority order; a source returns `None` for names
/// it does not define.
pub trait ConfigSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}
