//! Application state shared across handlers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use pnoh_core::types::UserId;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::models::Cart;
use crate::services::{CheckoutSessions, ClerkClient, IdentityError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("identity client error: {0}")]
    Identity(#[from] IdentityError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, content store, and service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    content: ContentStore,
    identity: ClerkClient,
    payments: CheckoutSessions,
    carts: CartRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `content_dir` - Directory holding the markdown content pages
    ///
    /// # Errors
    ///
    /// Returns an error if the content pages fail to load or the identity
    /// client cannot be built.
    pub fn new(config: StorefrontConfig, content_dir: &Path) -> Result<Self, StateError> {
        let identity = ClerkClient::new(&config.clerk)?;
        let payments = CheckoutSessions::new(config.base_url.clone());
        let content = ContentStore::load(content_dir)?;
        let catalog = Catalog::seed();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                content,
                identity,
                payments,
                carts: CartRegistry::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get a reference to the identity provider client.
    #[must_use]
    pub fn identity(&self) -> &ClerkClient {
        &self.inner.identity
    }

    /// Get a reference to the payment-session service.
    #[must_use]
    pub fn payments(&self) -> &CheckoutSessions {
        &self.inner.payments
    }

    /// Get a reference to the account cart registry.
    #[must_use]
    pub fn carts(&self) -> &CartRegistry {
        &self.inner.carts
    }
}

/// Process-lifetime carts for signed-in users.
///
/// When a user signs out, their session cart is parked here; on the next
/// sign-in it is merged with whatever they collected as a guest. The lock
/// exists to satisfy `Send + Sync`, not because contention is expected.
#[derive(Default)]
pub struct CartRegistry {
    carts: RwLock<HashMap<UserId, Cart>>,
}

impl CartRegistry {
    /// Remove and return the stored cart for a user.
    pub fn take(&self, user_id: &UserId) -> Option<Cart> {
        let mut carts = self
            .carts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        carts.remove(user_id)
    }

    /// Park a user's cart until their next sign-in.
    ///
    /// Empty carts are not worth keeping.
    pub fn store(&self, user_id: UserId, cart: Cart) {
        if cart.is_empty() {
            return;
        }
        let mut carts = self
            .carts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        carts.insert(user_id, cart);
    }
}
