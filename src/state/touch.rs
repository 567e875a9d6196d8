// Single-touch origin/delta bookkeeping for one card surface.

/// Records the origin of the current touch and the offsets of the latest
/// sample relative to it. Pure arithmetic; classification lives in the
/// gesture machine.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TouchTracker {
    start_x: f64,
    start_y: f64,
    delta_x: f64,
    delta_y: f64,
}

impl TouchTracker {
    /// New touch sequence: record the origin, drop any prior offsets.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.start_x = x;
        self.start_y = y;
        self.delta_x = 0.0;
        self.delta_y = 0.0;
    }

    pub fn update(&mut self, x: f64, y: f64) -> (f64, f64) {
        self.delta_x = x - self.start_x;
        self.delta_y = y - self.start_y;
        (self.delta_x, self.delta_y)
    }

    /// Final sample of the sequence; returns the closing deltas and resets.
    pub fn finish(&mut self, x: f64, y: f64) -> (f64, f64) {
        let out = self.update(x, y);
        *self = Self::default();
        out
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn deltas(&self) -> (f64, f64) {
        (self.delta_x, self.delta_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_relative_to_origin() {
        let mut t = TouchTracker::default();
        t.begin(100.0, 200.0);
        assert_eq!(t.update(130.0, 195.0), (30.0, -5.0));
        assert_eq!(t.deltas(), (30.0, -5.0));
    }

    #[test]
    fn begin_clears_previous_offsets() {
        let mut t = TouchTracker::default();
        t.begin(0.0, 0.0);
        t.update(50.0, 50.0);
        t.begin(10.0, 10.0);
        assert_eq!(t.deltas(), (0.0, 0.0));
    }

    #[test]
    fn finish_reports_closing_deltas_then_resets() {
        let mut t = TouchTracker::default();
        t.begin(10.0, 10.0);
        assert_eq!(t.finish(25.0, 4.0), (15.0, -6.0));
        assert_eq!(t.deltas(), (0.0, 0.0));
    }
}
