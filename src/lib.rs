//! Reconocimiento de bocetos: el navegador dibuja y envía eventos de
//! puntero + instantáneas del canvas; el servicio recorta, normaliza,
//! clasifica con ONNX y publica el top-K.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
