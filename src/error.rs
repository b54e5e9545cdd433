//! Error type shared by the fetchers, the pipeline and the preference store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The request could not be sent, or the provider answered with a
    /// non-success status.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The payload does not have the shape the provider contract promises.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid API key")]
    InvalidApiKey,

    #[error("location not found")]
    LocationNotFound,

    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("chart error: {0}")]
    Chart(String),
}

impl WeatherError {
    /// Message shown to the dashboard user.
    pub fn user_message(&self) -> String {
        match self {
            Self::TransportFailure(_) => "Erro ao buscar previsão.".to_string(),
            Self::MalformedResponse(_) => "Resposta inesperada do serviço de clima.".to_string(),
            Self::InvalidApiKey => "Chave de API inválida.".to_string(),
            Self::LocationNotFound => "Localização não encontrada.".to_string(),
            Self::MissingApiKey(var) => format!("Chave de API ausente ({var})."),
            Self::Storage(_) | Self::Chart(_) => "Ocorreu um erro desconhecido.".to_string(),
        }
    }

    /// Whether the error came from the network layer rather than the payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        // The request url carries the API key.
        let e = e.without_url();
        if e.is_decode() {
            WeatherError::MalformedResponse(e.to_string())
        } else {
            WeatherError::TransportFailure(e.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::MalformedResponse(e.to_string())
    }
}

impl From<std::io::Error> for WeatherError {
    fn from(e: std::io::Error) -> Self {
        WeatherError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
