//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::scene::Scene;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Keeps serialized scene documents in memory, for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, String>>,
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let serialized = scene.to_json();
        Box::pin(async move {
            let json = serialized?;
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.insert(key, json);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Scene>> {
        let key = key.to_string();
        Box::pin(async move {
            let json = {
                let docs = self.documents.read().map_err(lock_error)?;
                docs.get(&key).cloned()
            };
            let json = json.ok_or(StorageError::NotFound(key))?;
            Ok(Scene::from_json(&json)?)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            Ok(docs.keys().cloned().collect())
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            Ok(docs.contains_key(&key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Drawable, FreehandPath, Shape, Style};
    use kurbo::Point;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor for tests
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
                return result;
            }
        }
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(Drawable::new(
            Shape::FreehandPath(FreehandPath::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(3.5, 4.25),
            ])),
            Style::default(),
        ));
        scene
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let scene = sample_scene();

        block_on(storage.save("sketch", &scene)).unwrap();
        let loaded = block_on(storage.load("sketch")).unwrap();

        assert_eq!(loaded, scene);
        assert!(!loaded.can_undo());
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let scene = sample_scene();

        assert!(!block_on(storage.exists("sketch")).unwrap());
        block_on(storage.save("sketch", &scene)).unwrap();
        assert!(block_on(storage.exists("sketch")).unwrap());
        block_on(storage.delete("sketch")).unwrap();
        assert!(!block_on(storage.exists("sketch")).unwrap());
        block_on(storage.delete("sketch")).unwrap();
    }

    #[test]
    fn test_list_is_sorted() {
        let storage = MemoryStorage::new();
        let scene = Scene::new();

        block_on(storage.save("b", &scene)).unwrap();
        block_on(storage.save("a", &scene)).unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
