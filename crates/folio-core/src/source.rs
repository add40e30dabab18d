//! Where page metadata comes from.
//!
//! [`ContentMetadataSource`] is the single call site API for turning a slug
//! into [`PageData`]. `StaticDerivation` derives everything from the slug;
//! `RemoteLookup` asks a [`MetadataStore`]. Callers always `await` and handle
//! a `Result`, so swapping one variant for the other never changes them.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::meta::{PageData, PageMetadata, resolve};

/// Error type returned by metadata stores.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// A backing store that can look up metadata by slug.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Fetch metadata for `slug`.
    ///
    /// `Ok(None)` means the store answered and has no such item. `Err` means
    /// the store could not answer.
    async fn fetch(&self, slug: &str) -> Result<Option<PageMetadata>, StoreError>;
}

/// Failure to load page data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The content item does not exist.
    #[error("no content found for slug '{slug}'")]
    NotFound { slug: String },

    /// The backing store was unavailable.
    #[error("metadata lookup for '{slug}' failed: {source}")]
    Transient {
        slug: String,
        #[source]
        source: StoreError,
    },
}

impl LoadError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Capability that produces page data for a slug.
#[derive(Clone, Default)]
pub enum ContentMetadataSource {
    /// Derive title and description from the slug itself.
    #[default]
    StaticDerivation,

    /// Look the slug up in a store.
    RemoteLookup(Arc<dyn MetadataStore>),
}

impl ContentMetadataSource {
    /// Source backed by `store`.
    pub fn remote(store: impl MetadataStore + 'static) -> Self {
        Self::RemoteLookup(Arc::new(store))
    }

    /// Load page data for `slug`.
    pub async fn load(&self, slug: &str) -> Result<PageData, LoadError> {
        match self {
            Self::StaticDerivation => {
                debug!(slug, source = "static", "resolving page metadata");
                Ok(resolve(slug))
            }
            Self::RemoteLookup(store) => {
                debug!(slug, source = "remote", "resolving page metadata");
                match store.fetch(slug).await {
                    Ok(Some(meta)) => Ok(PageData::new(slug, meta)),
                    Ok(None) => Err(LoadError::NotFound {
                        slug: slug.to_string(),
                    }),
                    Err(source) => Err(LoadError::Transient {
                        slug: slug.to_string(),
                        source,
                    }),
                }
            }
        }
    }

    /// Short name of the active variant, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StaticDerivation => "static",
            Self::RemoteLookup(_) => "remote",
        }
    }
}

impl fmt::Debug for ContentMetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticDerivation => f.write_str("StaticDerivation"),
            Self::RemoteLookup(_) => f.write_str("RemoteLookup(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct MapStore(HashMap<String, PageMetadata>);

    #[async_trait]
    impl MetadataStore for MapStore {
        async fn fetch(&self, slug: &str) -> Result<Option<PageMetadata>, StoreError> {
            Ok(self.0.get(slug).cloned())
        }
    }

    struct FlakyStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetadataStore for FlakyStore {
        async fn fetch(&self, _slug: &str) -> Result<Option<PageMetadata>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err("storage unavailable".into())
        }
    }

    fn store() -> MapStore {
        MapStore(HashMap::from([(
            "my-first-post".to_string(),
            PageMetadata {
                title: "Hello, Folio".to_string(),
                description: "Our very first post.".to_string(),
            },
        )]))
    }

    #[tokio::test]
    async fn test_static_derivation_matches_resolve() {
        let source = ContentMetadataSource::StaticDerivation;
        let data = source.load("my-first-post").await.unwrap();
        assert_eq!(data, resolve("my-first-post"));
        assert_eq!(source.kind(), "static");
    }

    #[tokio::test]
    async fn test_static_derivation_empty_slug() {
        let data = ContentMetadataSource::default().load("").await.unwrap();
        assert_eq!(data.meta.title, "");
        assert_eq!(data.meta.description, "This is the  blog post.");
    }

    #[tokio::test]
    async fn test_remote_lookup_found() {
        let source = ContentMetadataSource::remote(store());
        let data = source.load("my-first-post").await.unwrap();
        assert_eq!(data.slug, "my-first-post");
        assert_eq!(data.meta.title, "Hello, Folio");
        assert_eq!(source.kind(), "remote");
    }

    #[tokio::test]
    async fn test_remote_lookup_not_found() {
        let source = ContentMetadataSource::remote(store());
        let err = source.load("missing-post").await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { ref slug } if slug == "missing-post"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_remote_lookup_transient_is_surfaced() {
        let store = Arc::new(FlakyStore {
            calls: AtomicUsize::new(0),
        });
        let source = ContentMetadataSource::RemoteLookup(store.clone());
        let err = source.load("my-first-post").await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("storage unavailable"));

        // Retrying reaches the store again.
        assert!(source.load("my-first-post").await.is_err());
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_does_not_require_store_debug() {
        let source = ContentMetadataSource::remote(store());
        assert_eq!(format!("{source:?}"), "RemoteLookup(..)");
    }
}
