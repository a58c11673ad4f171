//! Tower integration.
//!
//! [`RetryLayer`] wraps any `tower::Service` whose requests implement [`StorageRequest`] and
//! whose errors are [`Status`] values, running each call through a [`Retrier`].

use crate::error::RetryError;
use crate::request::StorageRequest;
use crate::{Retrier, Status};
use futures::future::{poll_fn, BoxFuture};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// Tower-native retry layer.
#[derive(Debug, Clone, Default)]
pub struct RetryLayer {
    retrier: Retrier,
}

impl RetryLayer {
    pub fn new(retrier: Retrier) -> Self {
        Self { retrier }
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RetryService { inner: service, retrier: self.retrier.clone() }
    }
}

/// Retry service produced by [`RetryLayer`].
#[derive(Debug, Clone)]
pub struct RetryService<S> {
    inner: S,
    retrier: Retrier,
}

impl<S, R> Service<R> for RetryService<S>
where
    R: StorageRequest + Clone + 'static,
    S: Service<R, Error = Status> + Clone + Send + 'static,
    S::Response: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = RetryError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    // Readiness is awaited per attempt on a clone of the inner service.
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: R) -> Self::Future {
        let inner = self.inner.clone();
        let retrier = self.retrier.clone();
        Box::pin(async move {
            let req = &request;
            retrier
                .execute(req, move || {
                    let mut service = inner.clone();
                    let attempt = req.clone();
                    async move {
                        poll_fn(|cx| service.poll_ready(cx)).await?;
                        service.call(attempt).await
                    }
                })
                .await
        })
    }
}
