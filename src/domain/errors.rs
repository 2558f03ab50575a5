use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Error de operación: {0}")]
    OperationFailed(String),
    #[error("El servicio aún no está listo")]
    NotReady,
    #[error("Trazo vacío: no hay puntos registrados")]
    EmptyStroke,
    #[error("Caja delimitadora degenerada ({width}x{height} px)")]
    DegenerateBox { width: u32, height: u32 },
    #[error("Índice de clase fuera de rango: {index} (clases: {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("El modelo produce {model} clases pero la lista tiene {names}")]
    ClassCountMismatch { model: usize, names: usize },
}

pub type DomainResult<T> = Result<T, DomainError>;
