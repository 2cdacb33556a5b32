use bevy_ecs::prelude::Resource;

/// Running session score, fed by collected items.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub items_collected: u32,
}

impl Score {
    pub fn add(&mut self, value: i32) {
        self.points = self.points.saturating_add_signed(value);
        self.items_collected += 1;
    }
}
