use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// One NPC's steering decision for the frame, published to the host page.
/// Flat f32 layout so JS can read it straight out of wasm memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SteeringRecord {
    pub entity: f32,
    /// Heading in radians; NaN when the NPC is not walking.
    pub angle: f32,
    /// 1.0 when the NPC walked this frame.
    pub should_move: f32,
    /// 1.0 while the NPC rests at a destination.
    pub arrived: f32,
}

impl SteeringRecord {
    pub const FLOATS: usize = 4;
}

/// Where an entity stands after the frame: id, x, z, heading.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PositionRecord {
    pub entity: f32,
    pub x: f32,
    pub z: f32,
    pub heading: f32,
}

impl PositionRecord {
    pub const FLOATS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_four_packed_floats() {
        assert_eq!(std::mem::size_of::<SteeringRecord>(), SteeringRecord::FLOATS * 4);
        assert_eq!(std::mem::size_of::<PositionRecord>(), PositionRecord::FLOATS * 4);
    }

    #[test]
    fn records_cast_to_flat_slices() {
        let records = [
            PositionRecord { entity: 1.0, x: 2.0, z: 3.0, heading: 0.5 },
            PositionRecord { entity: 2.0, x: -1.0, z: 4.0, heading: 0.0 },
        ];
        let flat: &[f32] = bytemuck::cast_slice(&records);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 0.5, 2.0, -1.0, 4.0, 0.0]);
    }
}
