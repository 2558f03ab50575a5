use super::errors::{DomainError, DomainResult};

/// Registro índice -> nombre de clase. Inmutable una vez cargado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    /// Una clase por línea; el orden define el índice. Se ignora la línea
    /// vacía final y los `\r` de finales de línea Windows.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let mut names: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        if names.last().is_some_and(|last| last.is_empty()) {
            names.pop();
        }
        Self::from_names(names)
    }

    pub fn from_names(names: Vec<String>) -> DomainResult<Self> {
        if names.is_empty() {
            return Err(DomainError::InvalidInput("lista de clases vacía".into()));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> DomainResult<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(DomainError::IndexOutOfRange { index, len: self.names.len() })
    }

    pub fn names_for(&self, indices: &[usize]) -> DomainResult<Vec<String>> {
        indices
            .iter()
            .map(|&i| self.get(i).map(str::to_string))
            .collect()
    }
}
