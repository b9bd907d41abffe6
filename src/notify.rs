use std::fmt;

use crate::ObjectId;

/// A subscriber invoked with the identity of the object that changed.
///
/// Subscribers are `Send` so that objects, and the pool owning them, can move between threads.
pub type UpdateCallback = Box<dyn FnMut(ObjectId) + Send>;

/// An ordered list of change subscribers.
///
/// Subscribers run synchronously, in registration order, on the thread performing the mutation.
#[derive(Default)]
pub struct Notifier {
    callbacks: Vec<UpdateCallback>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, callback: F)
    where
        F: FnMut(ObjectId) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn notify(&mut self, object_id: ObjectId) {
        for callback in self.callbacks.iter_mut() {
            callback(object_id);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
