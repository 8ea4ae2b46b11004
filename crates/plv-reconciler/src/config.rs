//! Reconciler configuration.

use plv_core::record::Address;
use plv_core::tags;
use plv_feed::TagSelector;

/// Configuration for a [`crate::Reconciler`].
#[derive(Clone, Debug)]
pub struct ReconcilerConfig {
    /// Marketplace authority: its revocations are honoured regardless of
    /// who created the targeted record.
    pub authority: Address,
    /// Page size for revocation lookups. Lookups always paginate to
    /// exhaustion; this only sizes the pages.
    pub lookup_page_size: usize,
    /// Protocol selectors prepended to every feed query.
    pub protocol: Vec<TagSelector>,
}

impl ReconcilerConfig {
    pub fn new(authority: Address) -> Self {
        Self {
            authority,
            lookup_page_size: 100,
            protocol: vec![
                TagSelector::eq(tags::PROTOCOL_NAME, tags::DEFAULT_PROTOCOL_NAME),
                TagSelector::eq(tags::PROTOCOL_VERSION, tags::DEFAULT_PROTOCOL_VERSION),
            ],
        }
    }

    pub fn builder(authority: Address) -> ReconcilerConfigBuilder {
        ReconcilerConfigBuilder {
            config: Self::new(authority),
        }
    }
}

/// Builder for reconciler configuration.
pub struct ReconcilerConfigBuilder {
    config: ReconcilerConfig,
}

impl ReconcilerConfigBuilder {
    pub fn lookup_page_size(mut self, size: usize) -> Self {
        self.config.lookup_page_size = size;
        self
    }

    /// Replace the protocol selectors (e.g. to accept several protocol
    /// versions during a migration window).
    pub fn protocol(mut self, selectors: Vec<TagSelector>) -> Self {
        self.config.protocol = selectors;
        self
    }

    pub fn build(self) -> ReconcilerConfig {
        self.config
    }
}
