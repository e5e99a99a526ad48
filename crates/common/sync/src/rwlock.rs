use std::sync::Arc;

use parking_lot::RwLock;

/// Read side of a published value. Cheap to clone and hand to request handlers.
#[derive(Debug)]
pub struct Reader<T>(Arc<RwLock<Arc<T>>>);

impl<T> Clone for Reader<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Unique write side of a published value.
///
/// The writer builds a complete replacement and swaps it in with [`Writer::publish`], so readers
/// only ever hold fully built snapshots.
#[derive(Debug)]
pub struct Writer<T>(Arc<RwLock<Arc<T>>>);

impl<T> Writer<T> {
    pub fn new(value: T) -> (Self, Reader<T>) {
        let arc = Arc::new(RwLock::new(Arc::new(value)));
        (Self(arc.clone()), Reader(arc))
    }

    /// The value most recently published.
    pub fn snapshot(&self) -> Arc<T> {
        self.0.read().clone()
    }

    /// Replace the published value. Returns the previous one.
    pub fn publish(&mut self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        std::mem::replace(&mut *self.0.write(), value)
    }

    pub fn reader(&self) -> Reader<T> {
        Reader(self.0.clone())
    }
}

impl<T: Clone> Writer<T> {
    /// Copy the current value, let `update` modify the copy, and publish it if `update` returns
    /// true. Readers keep seeing the old value until then.
    pub fn update<F>(&mut self, update: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut next = T::clone(&self.snapshot());
        if !update(&mut next) {
            return false;
        }
        self.publish(next);
        true
    }
}

impl<T> Reader<T> {
    pub fn snapshot(&self) -> Arc<T> {
        self.0.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_readers_see_published_value() {
        let (mut writer, reader) = Writer::new(vec![1u64]);
        let before = reader.snapshot();

        writer.publish(vec![1, 2]);

        assert_eq!(*before, vec![1]);
        assert_eq!(*reader.snapshot(), vec![1, 2]);
        assert_eq!(*writer.reader().snapshot(), vec![1, 2]);
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let (mut writer, reader) = Writer::new(vec![1u64]);
        let first = reader.snapshot();

        assert!(!writer.update(|value| {
            value.push(2);
            false
        }));
        assert!(Arc::ptr_eq(&first, &reader.snapshot()));

        assert!(writer.update(|value| {
            value.push(3);
            true
        }));
        assert_eq!(*reader.snapshot(), vec![1, 3]);
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_values() {
        let (mut writer, reader) = Writer::new((0u64, 0u64));
        let handles = (0..4)
            .map(|_| {
                let reader = reader.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let snapshot = reader.snapshot();
                        assert_eq!(snapshot.0, snapshot.1);
                    }
                })
            })
            .collect::<Vec<_>>();

        for i in 1..=1000 {
            writer.update(|value| {
                value.0 = i;
                value.1 = i;
                true
            });
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*reader.snapshot(), (1000, 1000));
    }
}
