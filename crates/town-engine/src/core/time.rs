/// Fixed-step frame clock.
/// The browser hands us variable frame deltas; movement and wander timers
/// advance in fixed steps so collision results do not depend on frame rate.
pub struct FrameClock {
    /// Seconds per simulation step.
    step: f32,
    /// Unspent frame time.
    accumulator: f32,
    /// Catch-up cap after a stall (backgrounded tab, debugger pause).
    max_steps: u32,
}

impl FrameClock {
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Bank a frame's delta and return how many fixed steps to run.
    /// Negative or non-finite deltas are treated as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        self.accumulator = self.accumulator.min(self.step * self.max_steps as f32);
        let steps = (self.accumulator / self.step) as u32;
        self.accumulator -= steps as f32 * self.step;
        steps
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}
