//! Replay buffer for the current round's strokes.

use scrawl_protocol::Point;

/// Strokes drawn so far this round, in arrival order.
///
/// Late joiners get the whole buffer replayed so their canvas matches
/// everyone else's. Cleared at the start and end of every round and on
/// `clearCanvas`.
#[derive(Debug, Default)]
pub struct DrawingRelay {
    strokes: Vec<Point>,
}

impl DrawingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, point: Point) {
        self.strokes.push(point);
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn replay(&self) -> impl Iterator<Item = Point> + '_ {
        self.strokes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
