//! A client wrapper that records calls and can inject failures.
//!
//! Useful for asserting how many round-trips an operation made, and what a
//! write request looked like after decoration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{ObjectBody, ObjectStoreClient};
use crate::error::{ClientError, ClientResult};
use crate::request::PutObjectRequest;

type FailureFn = Box<dyn Fn() -> ClientError + Send + Sync>;

/// Wraps a client, counting calls and capturing write requests.
pub struct RecordingClient<C> {
    inner: C,
    puts: Mutex<Vec<PutObjectRequest>>,
    put_calls: AtomicUsize,
    get_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    put_failure: Mutex<Option<FailureFn>>,
    get_failure: Mutex<Option<FailureFn>>,
    delete_failure: Mutex<Option<FailureFn>>,
}

impl<C: ObjectStoreClient> RecordingClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            puts: Mutex::new(Vec::new()),
            put_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            put_failure: Mutex::new(None),
            get_failure: Mutex::new(None),
            delete_failure: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Make every subsequent `put_object` fail with the produced error.
    pub fn fail_puts_with(&self, failure: impl Fn() -> ClientError + Send + Sync + 'static) {
        *self.put_failure.lock().expect("lock poisoned") = Some(Box::new(failure));
    }

    /// Make every subsequent `get_object` fail with the produced error.
    pub fn fail_gets_with(&self, failure: impl Fn() -> ClientError + Send + Sync + 'static) {
        *self.get_failure.lock().expect("lock poisoned") = Some(Box::new(failure));
    }

    /// Make every subsequent `delete_object` fail with the produced error.
    pub fn fail_deletes_with(&self, failure: impl Fn() -> ClientError + Send + Sync + 'static) {
        *self.delete_failure.lock().expect("lock poisoned") = Some(Box::new(failure));
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.put_calls() + self.get_calls() + self.delete_calls()
    }

    /// Every write request seen, in call order.
    pub fn puts(&self) -> Vec<PutObjectRequest> {
        self.puts.lock().expect("lock poisoned").clone()
    }

    pub fn last_put(&self) -> Option<PutObjectRequest> {
        self.puts.lock().expect("lock poisoned").last().cloned()
    }
}

fn injected(failure: &Mutex<Option<FailureFn>>) -> Option<ClientError> {
    failure.lock().expect("lock poisoned").as_ref().map(|f| f())
}

impl<C: ObjectStoreClient> ObjectStoreClient for RecordingClient<C> {
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.puts.lock().expect("lock poisoned").push(request.clone());
        if let Some(err) = injected(&self.put_failure) {
            return Err(err);
        }
        self.inner.put_object(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = injected(&self.get_failure) {
            return Err(err);
        }
        self.inner.get_object(bucket, key)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = injected(&self.delete_failure) {
            return Err(err);
        }
        self.inner.delete_object(bucket, key)
    }
}

impl<C> std::fmt::Debug for RecordingClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingClient")
            .field("put_calls", &self.put_calls.load(Ordering::SeqCst))
            .field("get_calls", &self.get_calls.load(Ordering::SeqCst))
            .field("delete_calls", &self.delete_calls.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
