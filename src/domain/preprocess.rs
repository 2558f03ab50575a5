//! Recorte, redimensionado y normalización del dibujo al formato de entrada
//! del clasificador: tensor NHWC `[1, 28, 28, 1]` con valores en `[0, 1]`.

use std::str::FromStr;

use image::RgbaImage;
use ndarray::{Array2, Array4, ArrayView4};
use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};
use super::stroke::BoundingBox;

/// Lado de la imagen con la que se entrenó el clasificador.
pub const INPUT_SIZE: usize = 28;

/// Instantánea RGBA del canvas en píxeles físicos (ya escalada por DPR).
#[derive(Debug, Clone)]
pub struct RawImage {
    pixels: RgbaImage,
}

impl RawImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Canal que se lee como intensidad única.
///
/// `Luma` toma el primer canal, que es lo que devuelve una lectura de un
/// canal sobre un canvas de fondo blanco y tinta negra. `Alpha` sirve para
/// canvas transparentes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkChannel {
    #[default]
    Luma,
    Alpha,
}

impl InkChannel {
    fn index(self) -> usize {
        match self {
            InkChannel::Luma => 0,
            InkChannel::Alpha => 3,
        }
    }
}

impl FromStr for InkChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "luma" => Ok(InkChannel::Luma),
            "alpha" => Ok(InkChannel::Alpha),
            other => Err(DomainError::InvalidInput(format!("canal de tinta desconocido: {other}"))),
        }
    }
}

/// Rectángulo en píxeles físicos. El origen puede caer fuera de la imagen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Escala la caja lógica por el DPR y trunca hacia cero, igual que una
    /// lectura de píxeles del canvas.
    pub fn from_bbox(bbox: &BoundingBox, device_pixel_ratio: f32) -> DomainResult<Self> {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "device_pixel_ratio inválido: {device_pixel_ratio}"
            )));
        }
        let scaled = [
            bbox.min.x * device_pixel_ratio,
            bbox.min.y * device_pixel_ratio,
            bbox.width() * device_pixel_ratio,
            bbox.height() * device_pixel_ratio,
        ];
        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::InvalidInput(format!("caja no finita: {bbox:?}")));
        }
        let width = scaled[2].trunc().max(0.0) as u32;
        let height = scaled[3].trunc().max(0.0) as u32;
        if width == 0 || height == 0 {
            return Err(DomainError::DegenerateBox { width, height });
        }
        Ok(Self {
            x: scaled[0].trunc() as i64,
            y: scaled[1].trunc() as i64,
            width,
            height,
        })
    }
}

/// Tensor de entrada del modelo. Siempre `[1, size, size, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedTensor {
    data: Array4<f32>,
}

impl PreprocessedTensor {
    /// Tensor nulo para el calentamiento del modelo.
    pub fn zeros(size: usize) -> Self {
        Self { data: Array4::zeros((1, size, size, 1)) }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Datos en orden NHWC contiguo.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    size: usize,
    channel: InkChannel,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(INPUT_SIZE, InkChannel::default())
    }
}

impl ImagePreprocessor {
    pub fn new(size: usize, channel: InkChannel) -> Self {
        Self { size, channel }
    }

    pub fn preprocess(
        &self,
        raw: &RawImage,
        bbox: &BoundingBox,
        device_pixel_ratio: f32,
    ) -> DomainResult<PreprocessedTensor> {
        let rect = PixelRect::from_bbox(bbox, device_pixel_ratio)?;
        // Se muestrea directamente de la instantánea: memoria O(size²) sea
        // cual sea el tamaño de la caja.
        let resized = resize_bilinear(
            rect.height as usize,
            rect.width as usize,
            self.size,
            self.size,
            |row, col| self.read(raw, rect, row, col),
        );

        // Contrato fijo con el modelo entrenado: v -> 1 - v/255.
        let data = Array4::from_shape_fn((1, self.size, self.size, 1), |(_, y, x, _)| {
            1.0 - resized[[y, x]] / 255.0
        });
        Ok(PreprocessedTensor { data })
    }

    /// Fuera de la imagen se lee negro transparente (0,0,0,0).
    fn read(&self, raw: &RawImage, rect: PixelRect, row: usize, col: usize) -> f32 {
        let x = rect.x.saturating_add(col as i64);
        let y = rect.y.saturating_add(row as i64);
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return 0.0;
        };
        raw.as_rgba()
            .get_pixel_checked(x, y)
            .map(|p| f32::from(p.0[self.channel.index()]))
            .unwrap_or(0.0)
    }
}

/// Bilineal estilo TensorFlow clásico (sin `align_corners` ni centros de
/// medio píxel): `src = dst * in / out`, vecinos limitados al borde.
/// `src(row, col)` solo se consulta en los vecinos de cada muestra.
fn resize_bilinear(
    in_h: usize,
    in_w: usize,
    out_h: usize,
    out_w: usize,
    src: impl Fn(usize, usize) -> f32,
) -> Array2<f32> {
    let scale_y = in_h as f64 / out_h as f64;
    let scale_x = in_w as f64 / out_w as f64;

    Array2::from_shape_fn((out_h, out_w), |(y, x)| {
        let fy = y as f64 * scale_y;
        let y0 = (fy.floor() as usize).min(in_h - 1);
        let y1 = (y0 + 1).min(in_h - 1);
        let dy = (fy - y0 as f64) as f32;

        let fx = x as f64 * scale_x;
        let x0 = (fx.floor() as usize).min(in_w - 1);
        let x1 = (x0 + 1).min(in_w - 1);
        let dx = (fx - x0 as f64) as f32;

        let top = src(y0, x0) + (src(y0, x1) - src(y0, x0)) * dx;
        let bottom = src(y1, x0) + (src(y1, x1) - src(y1, x0)) * dx;
        top + (bottom - top) * dy
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stroke::Point;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn bbox(min: (f32, f32), max: (f32, f32)) -> BoundingBox {
        BoundingBox { min: Point::new(min.0, min.1), max: Point::new(max.0, max.1) }
    }

    fn canvas(w: u32, h: u32, fill: Rgba<u8>) -> RawImage {
        RawImage::from_rgba(RgbaImage::from_pixel(w, h, fill))
    }

    #[test]
    fn output_has_batch_and_channel_dimensions() {
        let tensor = ImagePreprocessor::default()
            .preprocess(&canvas(100, 100, WHITE), &bbox((10.0, 10.0), (50.0, 60.0)), 1.0)
            .unwrap();
        assert_eq!(tensor.shape(), &[1, 28, 28, 1]);
        assert_eq!(tensor.to_vec().len(), 28 * 28);
    }

    #[test]
    fn blank_canvas_maps_to_no_ink_extreme() {
        let tensor = ImagePreprocessor::default()
            .preprocess(&canvas(100, 100, WHITE), &bbox((10.0, 10.0), (50.0, 60.0)), 1.0)
            .unwrap();
        assert!(tensor.view().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn fully_inked_region_maps_to_opposite_extreme() {
        let tensor = ImagePreprocessor::default()
            .preprocess(&canvas(100, 100, BLACK), &bbox((10.0, 10.0), (50.0, 60.0)), 1.0)
            .unwrap();
        assert!(tensor.view().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn alpha_channel_inverts_polarity_for_transparent_canvas() {
        let pre = ImagePreprocessor::new(INPUT_SIZE, InkChannel::Alpha);
        let blank = pre
            .preprocess(&canvas(64, 64, Rgba([0, 0, 0, 0])), &bbox((0.0, 0.0), (40.0, 40.0)), 1.0)
            .unwrap();
        assert!(blank.view().iter().all(|&v| v == 1.0));

        let inked = pre
            .preprocess(&canvas(64, 64, BLACK), &bbox((0.0, 0.0), (40.0, 40.0)), 1.0)
            .unwrap();
        assert!(inked.view().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn device_pixel_ratio_scales_the_crop() {
        // Tinta solo dentro de la caja escalada x2: (20,20)-(100,120).
        let mut img = RgbaImage::from_pixel(200, 200, WHITE);
        for y in 20..120 {
            for x in 20..100 {
                img.put_pixel(x, y, BLACK);
            }
        }
        let raw = RawImage::from_rgba(img);
        let tensor = ImagePreprocessor::default()
            .preprocess(&raw, &bbox((10.0, 10.0), (50.0, 60.0)), 2.0)
            .unwrap();
        assert!(tensor.view().iter().all(|&v| v == 1.0));

        let unscaled = ImagePreprocessor::default()
            .preprocess(&raw, &bbox((10.0, 10.0), (50.0, 60.0)), 1.0)
            .unwrap();
        assert!(unscaled.view().iter().any(|&v| v == 0.0));
    }

    #[test]
    fn same_size_crop_is_sampled_without_interpolation() {
        let mut img = RgbaImage::from_pixel(40, 40, WHITE);
        for y in 0..28u32 {
            for x in 0..28u32 {
                let v = ((x * 9 + y) % 256) as u8;
                img.put_pixel(x + 5, y + 5, Rgba([v, v, v, 255]));
            }
        }
        let tensor = ImagePreprocessor::default()
            .preprocess(&RawImage::from_rgba(img), &bbox((5.0, 5.0), (33.0, 33.0)), 1.0)
            .unwrap();
        let view = tensor.view();
        for y in 0..28usize {
            for x in 0..28usize {
                let v = ((x * 9 + y) % 256) as f32;
                assert!((view[[0, y, x, 0]] - (1.0 - v / 255.0)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn bilinear_downsample_interpolates_between_neighbours() {
        // Columnas alternas 0/255.
        let src = Array2::from_shape_fn((2, 4), |(_, x)| if x % 2 == 0 { 0.0 } else { 255.0 });
        let out = resize_bilinear(2, 4, 2, 3, |r, c| src[[r, c]]);
        // x=1 -> fx = 4/3, entre columnas 1 (255) y 2 (0).
        let expected = 255.0 + (0.0 - 255.0) * (4.0f32 / 3.0 - 1.0);
        assert!((out[[0, 1]] - expected).abs() < 1e-4);
        assert_eq!(out[[0, 0]], 0.0);
    }

    #[test]
    fn pixels_outside_snapshot_read_as_transparent_black() {
        let tensor = ImagePreprocessor::default()
            .preprocess(&canvas(10, 10, WHITE), &bbox((20.0, 20.0), (60.0, 60.0)), 1.0)
            .unwrap();
        assert!(tensor.view().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn huge_box_is_sampled_without_allocating_the_crop() {
        let tensor = ImagePreprocessor::default()
            .preprocess(&canvas(300, 300, WHITE), &bbox((0.0, 0.0), (1e6, 1e6)), 1.0)
            .unwrap();
        assert_eq!(tensor.shape(), &[1, 28, 28, 1]);
        // Solo la esquina (0,0) cae dentro del canvas blanco.
        assert_eq!(tensor.view()[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor.view()[[0, 27, 27, 0]], 1.0);
    }

    #[test]
    fn infinite_box_is_rejected() {
        let err = ImagePreprocessor::default()
            .preprocess(&canvas(10, 10, WHITE), &bbox((0.0, 0.0), (f32::INFINITY, 5.0)), 1.0)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let overflow = PixelRect::from_bbox(&bbox((0.0, 0.0), (f32::MAX, 5.0)), 2.0).unwrap_err();
        assert!(matches!(overflow, DomainError::InvalidInput(_)));
    }

    #[test]
    fn zero_area_box_is_rejected() {
        let err = ImagePreprocessor::default()
            .preprocess(&canvas(100, 100, WHITE), &bbox((5.0, 5.0), (5.0, 40.0)), 1.0)
            .unwrap_err();
        assert!(matches!(err, DomainError::DegenerateBox { width: 0, height: 35 }));
    }

    #[test]
    fn sub_pixel_box_truncates_to_degenerate() {
        let err = PixelRect::from_bbox(&bbox((0.0, 0.0), (0.4, 10.0)), 2.0).unwrap_err();
        assert!(matches!(err, DomainError::DegenerateBox { .. }));
    }

    #[test]
    fn invalid_device_pixel_ratio_is_rejected() {
        for dpr in [0.0, -1.0, f32::NAN] {
            let err = PixelRect::from_bbox(&bbox((0.0, 0.0), (10.0, 10.0)), dpr).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }

    #[test]
    fn ink_channel_parses_from_config_strings() {
        assert_eq!("luma".parse::<InkChannel>().unwrap(), InkChannel::Luma);
        assert_eq!(" Alpha ".parse::<InkChannel>().unwrap(), InkChannel::Alpha);
        assert!("red".parse::<InkChannel>().is_err());
    }
}
