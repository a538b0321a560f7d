// Holder that keeps instantiated custom content in sync with the player

use super::target::SpawnedContent;
use glam::Vec3;

/// Owns a player's custom content and mirrors the sprite flip onto it
///
/// Level-triggered: each tick compares the current flip flag with the last one
/// applied and rewrites the content's horizontal scale only on change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomContentHolder {
    content: Option<SpawnedContent>,
    last_flip_x: bool,
}

impl CustomContentHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind freshly instantiated content, replacing any previous content
    pub fn bind(&mut self, content: SpawnedContent) {
        // Track whatever flip the new content already shows
        self.last_flip_x = content.local_scale.x < 0.0;
        self.content = Some(content);
    }

    /// Whether content has been bound
    pub fn is_ready(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&SpawnedContent> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut SpawnedContent> {
        self.content.as_mut()
    }

    /// Mirror the flip flag; returns whether the content was updated
    pub fn tick(&mut self, flip_x: bool) -> bool {
        let Some(content) = self.content.as_mut() else {
            return false;
        };

        if flip_x == self.last_flip_x {
            return false;
        }

        content.local_scale = Vec3::new(if flip_x { -1.0 } else { 1.0 }, 1.0, 1.0);
        self.last_flip_x = flip_x;
        true
    }
}
