use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoCallError {
    #[error("{0}")]
    InvalidGeometry(String),

    #[error("keyword argument `{0}` conflicts with a positional argument")]
    ConflictingKeyword(String),

    #[error("unexpected keyword argument `{0}`")]
    UnknownKeyword(String),

    #[error("geometry constructor API is not bound")]
    ApiNotBound,

    #[error("unknown API function: {0}")]
    UnknownFunction(String),

    #[error("{function} does not accept parameter `{parameter}`")]
    UnexpectedParameter {
        function: &'static str,
        parameter: String,
    },

    #[error("{0}")]
    ComputedGeometry(&'static str),

    #[error("geozero error: {0}")]
    Geozero(#[from] geozero::error::GeozeroError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeoCallError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeoCallError::InvalidGeometry(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GeoCallError>;
