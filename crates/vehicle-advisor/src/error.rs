//! Error Types for Vehicle Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// A value the answer cannot be built without was not found in the message
    #[error("Missing parameter: {name}")]
    MissingParameter { name: String, example: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No catalog row satisfied the lookup; the payload names the entity
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Catalog query failed: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisorError {
    /// Text shown to the customer in place of an answer
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingParameter { name, example } => format!(
                "❌ Não consegui identificar {name}. Por favor, especifique como '{example}'"
            ),
            Self::InvalidParameter(msg) => format!("❌ Parâmetro inválido: {msg}"),
            Self::NotFound(entity) => format!(
                "❌ Não encontramos {entity} em nossa base de dados. Consulte 'carro barato' ou 'carro mais caro' para ver opções disponíveis."
            ),
            Self::StoreUnavailable(_) => "❌ Conexão com base de dados indisponível".into(),
            Self::Query(_) | Self::Config(_) | Self::Serialization(_) => {
                "❌ Desculpe, não foi possível consultar nossa base de dados agora. Tente novamente em instantes.".into()
            }
        }
    }

    /// Whether the failure came from the catalog rather than the message
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Query(_))
    }
}

impl From<sqlx::Error> for AdvisorError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => Self::StoreUnavailable(err.to_string()),
            other => Self::Query(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_entity() {
        let err = AdvisorError::NotFound("o veículo Fiat Argo".into());
        assert!(err.user_message().contains("Não encontramos o veículo Fiat Argo"));
    }

    #[test]
    fn test_missing_parameter_shows_example() {
        let err = AdvisorError::MissingParameter {
            name: "o valor da parcela desejada".into(),
            example: "parcela de R$ 1.000".into(),
        };
        assert_eq!(
            err.user_message(),
            "❌ Não consegui identificar o valor da parcela desejada. Por favor, especifique como 'parcela de R$ 1.000'"
        );
    }

    #[test]
    fn test_pool_timeout_is_store_unavailable() {
        let err = AdvisorError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AdvisorError::StoreUnavailable(_)));
        assert!(err.is_store_failure());
    }

    #[test]
    fn test_row_decode_is_query_error() {
        let err = AdvisorError::from(sqlx::Error::ColumnNotFound("brand".into()));
        assert!(matches!(err, AdvisorError::Query(_)));
    }
}
