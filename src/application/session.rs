use crate::domain::{
    errors::DomainResult,
    stroke::{BoundingBox, Point, StrokeTracker},
};

/// Resultado de soltar el puntero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// No hay puntos suficientes; no se predice.
    TooShort { points: usize },
    Complete(BoundingBox),
}

/// Estado de dibujo de una sesión: los puntos se acumulan entre trazos y
/// solo se borran con `erase`.
#[derive(Debug)]
pub struct DrawingSession {
    tracker: StrokeTracker,
    min_points: usize,
}

impl DrawingSession {
    pub fn new(min_points: usize) -> Self {
        Self { tracker: StrokeTracker::new(), min_points }
    }

    pub fn pointer_down(&mut self) {
        self.tracker.begin();
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.tracker.record(point)
    }

    pub fn pointer_up(&mut self) -> DomainResult<GestureOutcome> {
        self.tracker.end();
        let points = self.tracker.len();
        if points < self.min_points {
            return Ok(GestureOutcome::TooShort { points });
        }
        Ok(GestureOutcome::Complete(self.tracker.bounding_box()?))
    }

    /// Suelta el puntero sin evaluar el trazo.
    pub fn end_gesture(&mut self) {
        self.tracker.end();
    }

    pub fn erase(&mut self) {
        self.tracker.reset();
    }

    pub fn point_count(&self) -> usize {
        self.tracker.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_gesture_is_too_short() {
        let mut session = DrawingSession::new(2);
        session.pointer_down();
        session.pointer_move(Point::new(3.0, 3.0));
        assert_eq!(session.pointer_up().unwrap(), GestureOutcome::TooShort { points: 1 });
        // Gesto terminado: los movimientos posteriores no cuentan.
        session.pointer_move(Point::new(4.0, 4.0));
        assert_eq!(session.point_count(), 1);
    }

    #[test]
    fn points_accumulate_across_strokes_until_erase() {
        let mut session = DrawingSession::new(2);
        session.pointer_down();
        session.pointer_move(Point::new(10.0, 10.0));
        session.pointer_move(Point::new(20.0, 20.0));
        session.pointer_up().unwrap();

        session.pointer_move(Point::new(90.0, 90.0)); // sin pulsar: ignorado
        session.pointer_down();
        session.pointer_move(Point::new(5.0, 40.0));
        let GestureOutcome::Complete(bbox) = session.pointer_up().unwrap() else {
            panic!("expected a complete gesture");
        };
        assert_eq!(bbox.min, Point::new(5.0, 10.0));
        assert_eq!(bbox.max, Point::new(20.0, 40.0));

        session.erase();
        assert_eq!(session.point_count(), 0);
    }
}
