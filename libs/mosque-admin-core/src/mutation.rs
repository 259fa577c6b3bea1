//! Write descriptors and the mutation lifecycle
//!
//! Every write goes through the same lifecycle:
//!
//! 1. state becomes `Pending` and the API call runs
//! 2. on success the success notification and callback fire; on failure the
//!    error is logged, the error notification and callback fire
//! 3. on settle, whatever the outcome, every root listed in
//!    [`MutationSpec::invalidates`] is invalidated in the shared cache
//! 4. the data (or the error) is returned to the caller
//!
//! There are no retries. A failed mutation must be invoked again explicitly.

use crate::client::QueryClient;
use crate::error::{AdminError, Result};
use futures_util::future::{BoxFuture, FutureExt};
use mosque_admin_common::{truncate_string, MAX_LOGGED_ERROR_LENGTH};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

/// Boxed API call of a [`MutationSpec`]
pub type ExecuteFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<Option<O>>> + Send + Sync>;

type SuccessCallback<O> = Arc<dyn Fn(Option<&O>) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&AdminError) + Send + Sync>;

/// Caller-supplied hooks, invoked after the built-in notification
pub struct MutationCallbacks<O> {
    on_success: Option<SuccessCallback<O>>,
    on_error: Option<ErrorCallback>,
}

impl<O> MutationCallbacks<O> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }

    #[must_use]
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&O>) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&AdminError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl<O> Default for MutationCallbacks<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for MutationCallbacks<O> {
    fn clone(&self) -> Self {
        Self {
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

/// API call, notifications, callbacks and invalidation set of one write
pub struct MutationSpec<I, O> {
    /// What the mutation does, for logs ("creating prayer configuration")
    pub action: &'static str,
    pub execute: ExecuteFn<I, O>,
    /// Resource roots invalidated on settle
    pub invalidates: Vec<&'static str>,
    pub success_message: Option<&'static str>,
    pub error_message: Option<&'static str>,
    pub callbacks: MutationCallbacks<O>,
}

impl<I: 'static, O: 'static> MutationSpec<I, O> {
    pub fn new<F, Fut>(action: &'static str, execute: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<O>>> + Send + 'static,
    {
        Self {
            action,
            execute: Arc::new(move |input| execute(input).boxed()),
            invalidates: Vec::new(),
            success_message: None,
            error_message: None,
            callbacks: MutationCallbacks::new(),
        }
    }

    /// Invalidate `root` on settle
    #[must_use]
    pub fn invalidates(mut self, root: &'static str) -> Self {
        if !self.invalidates.contains(&root) {
            self.invalidates.push(root);
        }
        self
    }

    #[must_use]
    pub fn success_message(mut self, message: &'static str) -> Self {
        self.success_message = Some(message);
        self
    }

    #[must_use]
    pub fn error_message(mut self, message: &'static str) -> Self {
        self.error_message = Some(message);
        self
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: MutationCallbacks<O>) -> Self {
        self.callbacks = callbacks;
        self
    }
}

impl<I, O> fmt::Debug for MutationSpec<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationSpec")
            .field("action", &self.action)
            .field("invalidates", &self.invalidates)
            .finish_non_exhaustive()
    }
}

/// How a settled mutation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Success,
    Error { message: String },
}

/// Lifecycle state of a [`Mutation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
    Success,
    Error { message: String },
    /// Terminal: the outcome is known and invalidation has run
    Settled(MutationOutcome),
}

impl MutationState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }
}

/// A runnable write bound to a [`QueryClient`]
pub struct Mutation<I, O> {
    spec: MutationSpec<I, O>,
    client: QueryClient,
    state: watch::Sender<MutationState>,
}

impl<I, O> Mutation<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    pub(crate) fn new(client: QueryClient, spec: MutationSpec<I, O>) -> Self {
        let (state, _) = watch::channel(MutationState::Idle);
        Self {
            spec,
            client,
            state,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    /// Observe state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn spec(&self) -> &MutationSpec<I, O> {
        &self.spec
    }

    /// Run the mutation through its full lifecycle
    ///
    /// # Errors
    /// Returns the API error unchanged after callbacks and invalidation ran
    #[instrument(skip(self, input), fields(action = self.spec.action))]
    pub async fn mutate(&self, input: I) -> Result<Option<O>> {
        self.state.send_replace(MutationState::Pending);
        debug!("Mutation pending: {}", self.spec.action);

        let result = (self.spec.execute)(input).await;

        let outcome = match &result {
            Ok(data) => {
                self.state.send_replace(MutationState::Success);
                info!("Mutation succeeded: {}", self.spec.action);
                if let Some(message) = self.spec.success_message {
                    self.client.notifier().success(message);
                }
                if let Some(on_success) = &self.spec.callbacks.on_success {
                    on_success(data.as_ref());
                }
                MutationOutcome::Success
            }
            Err(e) => {
                let message = e.to_string();
                error!(
                    "Error {}: {}",
                    self.spec.action,
                    truncate_string(&message, MAX_LOGGED_ERROR_LENGTH)
                );
                self.state.send_replace(MutationState::Error {
                    message: message.clone(),
                });
                if let Some(notice) = self.spec.error_message {
                    self.client.notifier().error(notice);
                }
                if let Some(on_error) = &self.spec.callbacks.on_error {
                    on_error(e);
                }
                MutationOutcome::Error { message }
            }
        };

        for root in &self.spec.invalidates {
            self.client.invalidate(root);
        }
        self.state.send_replace(MutationState::Settled(outcome));
        debug!("Mutation settled: {}", self.spec.action);

        result
    }
}
