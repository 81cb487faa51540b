//! Opaque texture handles.
//!
//! Textures are owned by an external resource manager. The particle core only
//! stores the handle it was given and forwards it with each draw submission.

/// Opaque identifier of a texture owned by the resource manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Resolves a texture path to a handle.
///
/// Implemented by whatever owns the loaded textures, e.g.
/// [`TextureStore`](crate::resources::texturestore::TextureStore).
pub trait TextureResolver {
    /// Look up `path`. Returns `None` when the texture is not loaded.
    fn resolve(&self, path: &str) -> Option<TextureHandle>;
}
