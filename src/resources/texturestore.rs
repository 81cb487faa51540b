use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;

use crate::particles::texture::{TextureHandle, TextureResolver};

/// Loaded textures keyed by path.
///
/// Stands in for the renderer's resource manager: it hands out opaque
/// handles and keeps ownership of the textures behind them.
#[derive(Resource, Debug, Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, TextureHandle>,
    next: u32,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` and return its handle. Registering a path twice
    /// returns the existing handle.
    pub fn insert(&mut self, path: impl Into<String>) -> TextureHandle {
        let path = path.into();
        if let Some(handle) = self.map.get(&path) {
            return *handle;
        }
        let handle = TextureHandle(self.next);
        self.next += 1;
        info!("Texture '{}' registered as {:?}", path, handle);
        self.map.insert(path, handle);
        handle
    }
}

impl TextureResolver for TextureStore {
    fn resolve(&self, path: &str) -> Option<TextureHandle> {
        self.map.get(path).copied()
    }
}
