//! Loading controller shared by every feature that pulls remote data.
//!
//! An [`AsyncResource`] runs a loader on the tokio runtime and publishes a
//! [`ResourceState`] snapshot. Each `start`/`reload` is a new request with a
//! higher generation; only the latest generation may ever commit, no matter
//! in which order the underlying futures finish.

use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::cache::ResponseCache;
use crate::error::LoadError;

pub const DEFAULT_ERROR_MESSAGE: &str = "데이터를 불러오는데 실패했습니다";

pub type LoadFuture<T> = BoxFuture<'static, Result<T, LoadError>>;
pub type Loader<T> = Arc<dyn Fn(CancellationToken) -> LoadFuture<T> + Send + Sync>;
pub type KeyLoader<K, T> = Arc<dyn Fn(K, CancellationToken) -> LoadFuture<T> + Send + Sync>;
pub type ErrorFormatter = Arc<dyn Fn(&LoadError) -> String + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&LoadError) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    fn loading(data: T) -> Self {
        Self {
            data,
            is_loading: true,
            error: None,
        }
    }
}

/// Error presentation for a resource. Both hooks are optional.
#[derive(Clone, Default)]
pub struct ResourceOptions {
    formatter: Option<ErrorFormatter>,
    on_error: Option<ErrorHook>,
}

impl ResourceOptions {
    pub fn error_message(mut self, formatter: impl Fn(&LoadError) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn on_error(mut self, hook: impl Fn(&LoadError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    fn message_for(&self, err: &LoadError) -> String {
        if let Some(formatter) = &self.formatter {
            return formatter(err);
        }
        let message = err.to_string();
        if message.is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

struct Request {
    generation: u64,
    token: CancellationToken,
}

struct Shared<T> {
    request: Mutex<Request>,
    state: watch::Sender<ResourceState<T>>,
    options: ResourceOptions,
}

impl<T> Shared<T> {
    fn request(&self) -> MutexGuard<'_, Request> {
        self.request.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispose(&self) {
        let mut request = self.request();
        request.generation += 1;
        request.token.cancel();
    }
}

impl<T: Clone> Shared<T> {
    // Supersedes whatever is in flight and hands out the new request's identity.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut request = self.request();
        request.token.cancel();
        request.generation += 1;
        request.token = CancellationToken::new();

        let data = self.state.borrow().data.clone();
        self.state.send_replace(ResourceState::loading(data));
        (request.generation, request.token.clone())
    }

    fn commit(&self, generation: u64, token: &CancellationToken, outcome: Result<T, LoadError>) {
        // The formatter is caller code and must not run under the request lock.
        let message = match &outcome {
            Err(err) if !err.is_cancelled() => Some(self.options.message_for(err)),
            _ => None,
        };

        let request = self.request();
        if request.generation != generation || token.is_cancelled() {
            log::debug!(
                "discarding result of request {generation}, current is {}",
                request.generation
            );
            return;
        }

        let (err, message) = match (outcome, message) {
            (Ok(data), _) => {
                self.state.send_replace(ResourceState {
                    data,
                    is_loading: false,
                    error: None,
                });
                return;
            }
            (Err(err), Some(message)) => (err, message),
            (Err(_), None) => return,
        };

        log::warn!("request {generation} failed: {err}");
        let data = self.state.borrow().data.clone();
        self.state.send_replace(ResourceState {
            data,
            is_loading: false,
            error: Some(message),
        });
        drop(request);

        if let Some(hook) = &self.options.on_error {
            hook(&err);
        }
    }
}

/// Runs a loader and keeps the outcome of its latest invocation.
///
/// Must be used from within a tokio runtime: every request is a spawned task.
/// Dropping the resource cancels the in-flight request and makes any late
/// result inert.
pub struct AsyncResource<T> {
    shared: Arc<Shared<T>>,
    loader: Loader<T>,
}

impl<T> AsyncResource<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn start<F, Fut>(load: F, initial_data: T) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    {
        Self::start_with(ResourceOptions::default(), load, initial_data)
    }

    pub fn start_with<F, Fut>(options: ResourceOptions, load: F, initial_data: T) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    {
        let loader: Loader<T> = Arc::new(move |token| load(token).boxed());
        Self::from_loader(options, loader, initial_data)
    }

    pub fn from_loader(options: ResourceOptions, loader: Loader<T>, initial_data: T) -> Self {
        let (state, _) = watch::channel(ResourceState::loading(initial_data));
        let shared = Arc::new(Shared {
            request: Mutex::new(Request {
                generation: 0,
                token: CancellationToken::new(),
            }),
            state,
            options,
        });
        let resource = Self { shared, loader };
        resource.reload();
        resource
    }

    /// Issues a fresh request with the current loader, superseding any
    /// request still in flight.
    pub fn reload(&self) {
        let (generation, token) = self.shared.begin();
        let future = (self.loader)(token.clone());
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    log::debug!("request {generation} cancelled before settling");
                }
                outcome = future => shared.commit(generation, &token, outcome),
            }
        });
    }

    /// Swaps the loader (the dependency changed) and starts a request with it.
    pub fn rebind(&mut self, loader: Loader<T>) {
        self.loader = loader;
        self.reload();
    }

    pub fn state(&self) -> ResourceState<T> {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.shared.state.subscribe()
    }

    /// Waits until the latest request has committed.
    pub async fn settled(&self) -> ResourceState<T> {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.shared.request().generation
    }

    /// Cancels the in-flight request; nothing commits after this.
    pub fn dispose(&self) {
        self.shared.dispose();
    }
}

impl<T> Drop for AsyncResource<T> {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

/// An [`AsyncResource`] whose loader depends on a key, such as the selected
/// script. Changing the key starts a new request. Values are cached per key
/// until invalidated or until the resource is dropped.
pub struct KeyedResource<K, T> {
    key: K,
    load: KeyLoader<K, T>,
    cache: ResponseCache<K, T>,
    resource: AsyncResource<T>,
}

impl<K, T> KeyedResource<K, T>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn start<F, Fut>(key: K, load: F, initial_data: T) -> Self
    where
        F: Fn(K, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    {
        Self::start_with(ResourceOptions::default(), key, load, initial_data)
    }

    pub fn start_with<F, Fut>(options: ResourceOptions, key: K, load: F, initial_data: T) -> Self
    where
        F: Fn(K, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    {
        let load: KeyLoader<K, T> = Arc::new(move |key, token| load(key, token).boxed());
        let cache = ResponseCache::new();
        let loader = Self::bind(key.clone(), Arc::clone(&load), cache.clone());
        Self {
            key,
            load,
            cache,
            resource: AsyncResource::from_loader(options, loader, initial_data),
        }
    }

    fn bind(key: K, load: KeyLoader<K, T>, cache: ResponseCache<K, T>) -> Loader<T> {
        Arc::new(move |token| {
            let key = key.clone();
            let load = Arc::clone(&load);
            let cache = cache.clone();
            async move {
                if let Some(hit) = cache.get(&key) {
                    return Ok(hit);
                }
                let value = load(key.clone(), token.clone()).await?;
                // A superseded request must not refill an entry a reload just dropped.
                if !token.is_cancelled() {
                    cache.insert(key, value.clone());
                }
                Ok(value)
            }
            .boxed()
        })
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns `true` when the key changed and a new request was issued.
    pub fn set_key(&mut self, key: K) -> bool {
        if key == self.key {
            return false;
        }
        self.key = key.clone();
        let loader = Self::bind(key, Arc::clone(&self.load), self.cache.clone());
        self.resource.rebind(loader);
        true
    }

    /// Drops the cached value for the current key and fetches it again.
    pub fn reload(&self) {
        self.cache.invalidate(&self.key);
        self.resource.reload();
    }

    pub fn invalidate(&self, key: &K) {
        self.cache.invalidate(key);
    }

    pub fn cache(&self) -> &ResponseCache<K, T> {
        &self.cache
    }

    pub fn state(&self) -> ResourceState<T> {
        self.resource.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.resource.subscribe()
    }

    pub async fn settled(&self) -> ResourceState<T> {
        self.resource.settled().await
    }
}

impl<K, T> Drop for KeyedResource<K, T> {
    fn drop(&mut self) {
        self.cache.clear();
    }
}
