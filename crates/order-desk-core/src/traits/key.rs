//! Cache key trait and implementations

/// Trait for types that can be used as cache keys
///
/// Two values describing the same query must produce the same key, whatever
/// order their fields were set in.
pub trait CacheKey: Send + Sync {
    /// Generate the key string
    fn cache_key(&self) -> String;

    /// Optional namespace for the key
    fn namespace(&self) -> Option<&str> {
        None
    }

    /// Get the full key including namespace
    fn full_key(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}:{}", ns, self.cache_key()),
            None => self.cache_key(),
        }
    }
}

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

impl CacheKey for str {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl<K: CacheKey + ?Sized> CacheKey for &K {
    fn cache_key(&self) -> String {
        (**self).cache_key()
    }

    fn namespace(&self) -> Option<&str> {
        (**self).namespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scoped(&'static str);

    impl CacheKey for Scoped {
        fn cache_key(&self) -> String {
            self.0.to_string()
        }

        fn namespace(&self) -> Option<&str> {
            Some("stats")
        }
    }

    #[test]
    fn test_string_key() {
        let key = "my_key".to_string();
        assert_eq!(key.cache_key(), "my_key");
        assert_eq!(key.full_key(), "my_key");
    }

    #[test]
    fn test_str_key() {
        let key = "my_key";
        assert_eq!(key.cache_key(), "my_key");
    }

    #[test]
    fn test_namespaced_key() {
        assert_eq!(Scoped("monthly").full_key(), "stats:monthly");
    }

    #[test]
    fn test_reference_keeps_namespace() {
        let key = Scoped("weekly");
        assert_eq!((&key).full_key(), "stats:weekly");
    }
}
