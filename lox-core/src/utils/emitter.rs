use std::{rc::Rc, sync::{atomic::{AtomicUsize, Ordering}, Arc, RwLock}};

use super::error::Error;

/// Sink for errors reported by the pipeline.
pub trait ErrorEmitterIO {
    fn emit_error(&self, error: Error);
}

#[derive(Debug, Clone, Copy)]
pub struct NullErrorEmitterIO;

impl ErrorEmitterIO for NullErrorEmitterIO {
    fn emit_error(&self, _error: Error) {}
}

#[derive(Debug, Default, Clone)]
pub struct VectorErrorEmitterIO {
    pub errors: Arc<RwLock<Vec<Error>>>
}

impl VectorErrorEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Error> {
        let mut errors = self.write_lock();
        std::mem::take(&mut *errors)
    }

    pub fn reset(&self) {
        let mut errors = self.write_lock();
        errors.clear();
    }

    pub fn pop(&self) -> Option<Error> {
        let mut errors = self.write_lock();
        errors.pop()
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Error>> {
        self.errors.write().expect("Vector lock poisoned")
    }
}

impl ErrorEmitterIO for VectorErrorEmitterIO {
    fn emit_error(&self, error: Error) {
        let mut errors = self.write_lock();

        errors.push(error);
    }
}

/// Counts what passes through to the wrapped sink.
#[derive(Clone)]
pub struct ErrorEmitter {
    count: Arc<AtomicUsize>,
    emitter: Rc<dyn ErrorEmitterIO>
}

impl ErrorEmitter {
    pub fn new(emitter: Rc<dyn ErrorEmitterIO>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullErrorEmitterIO))
    }

    pub fn reset_count(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn emit(&self, error: Error) {
        _ = self.count.fetch_add(1, Ordering::Relaxed);
        self.emitter.emit_error(error);
    }
}
