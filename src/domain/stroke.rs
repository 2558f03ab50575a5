//! Seguimiento de trazos a mano alzada y su caja delimitadora mínima.

use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Posición del puntero en coordenadas lógicas del canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Acumula los puntos del gesto actual.
///
/// Solo registra mientras el gesto está activo (puntero pulsado) y descarta
/// coordenadas negativas, que aparecen cuando el puntero sale del canvas.
#[derive(Debug, Default)]
pub struct StrokeTracker {
    points: Vec<Point>,
    active: bool,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.active = true;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.active
    }

    /// Devuelve `true` si el punto se ha añadido. Solo se aceptan
    /// coordenadas finitas y no negativas.
    pub fn record(&mut self, point: Point) -> bool {
        let valid = point.x.is_finite() && point.y.is_finite() && point.x >= 0.0 && point.y >= 0.0;
        if !self.active || !valid {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Caja mínima sobre todos los puntos registrados (mín/máx por eje).
    pub fn bounding_box(&self) -> DomainResult<BoundingBox> {
        let (first, rest) = self.points.split_first().ok_or(DomainError::EmptyStroke)?;
        let bbox = rest.iter().fold(
            BoundingBox { min: *first, max: *first },
            |acc, p| BoundingBox {
                min: Point::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
                max: Point::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
            },
        );
        Ok(bbox)
    }
}
