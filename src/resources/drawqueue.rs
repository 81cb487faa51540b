//! Per-frame list of billboard draw calls.
//!
//! [`particle_draw_system`](crate::systems::particles::particle_draw_system)
//! refills this resource after the update pass; the renderer drains it.

use bevy_ecs::prelude::Resource;

use crate::particles::billboard::{BillboardRenderer, DrawSubmission};

#[derive(Resource, Debug, Default)]
pub struct DrawQueue {
    pub submissions: Vec<DrawSubmission>,
}

impl DrawQueue {
    pub fn clear(&mut self) {
        self.submissions.clear();
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

impl BillboardRenderer for DrawQueue {
    fn draw_billboard(&mut self, submission: DrawSubmission) {
        self.submissions.push(submission);
    }
}
