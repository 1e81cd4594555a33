//! Injected state containers.
//!
//! A [`Store`] holds one value for the lifetime of a mount: created with a
//! default (or a persisted value), updated through [`Store::update`], and
//! dropped back to its default by [`Store::reset`]. Subscribers run after
//! every change. A [`StoreBackend`] optionally persists the value as
//! bincode between mounts.

mod backend;
mod cart;

use std::fmt;
use std::rc::Rc;

pub use backend::*;
pub use cart::*;
use log::debug;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// A value container with subscribe and reset semantics.
///
/// # Example
///
/// ```
/// use dataframe_lib::store::{Cart, CartItem, Store};
/// use rust_decimal::Decimal;
///
/// let mut store: Store<Cart> = Store::create("cart");
/// store.update(|cart| cart.add(CartItem::new("p-1", "Widget", Decimal::new(1999, 2), 2))).unwrap();
/// assert_eq!(store.get().total(), Decimal::new(3998, 2));
///
/// store.reset().unwrap();
/// assert!(store.get().is_empty());
/// ```
pub struct Store<T> {
    key: String,
    state: T,
    backend: Option<Rc<dyn StoreBackend>>,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_id: u64,
}

impl<T> Store<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Creates an in-memory store holding `T::default()`.
    pub fn create(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: T::default(),
            backend: None,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Creates a store backed by `backend`, starting from the saved value
    /// if there is one.
    pub fn open(key: impl Into<String>, backend: Rc<dyn StoreBackend>) -> Result<Self, StoreError> {
        let mut store = Self::create(key);
        if let Some(bytes) = backend.load(&store.key)? {
            store.state = bincode::deserialize(&bytes).map_err(StoreError::Deserialization)?;
            debug!("[store] {} restored {} bytes", store.key, bytes.len());
        }
        store.backend = Some(backend);
        Ok(store)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.state
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    /// Changes the value, persists it and notifies subscribers.
    ///
    /// Subscribers are notified even if persisting fails; the error is
    /// still returned.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, StoreError> {
        let result = f(&mut self.state);
        let saved = self.persist();
        self.notify();
        saved.map(|_| result)
    }

    /// Replaces the value.
    pub fn set(&mut self, value: T) -> Result<(), StoreError> {
        self.update(|state| *state = value)
    }

    /// Returns to `T::default()` and forgets the persisted value.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.state = T::default();
        let removed = match &self.backend {
            Some(backend) => backend.remove(&self.key),
            None => Ok(()),
        };
        debug!("[store] {} reset", self.key);
        self.notify();
        removed
    }

    pub fn subscribe(&mut self, f: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Rc::new(f)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let bytes = bincode::serialize(&self.state).map_err(StoreError::Serialization)?;
        backend.save(&self.key, &bytes).inspect_err(|e| {
            warn!("[store] {} could not be saved: {e}", self.key);
        })
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("backend", &self.backend.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
