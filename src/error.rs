/// Error codes of the EIP-1193 provider errors, plus the JSON-RPC codes
/// the injected providers commonly return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum ProviderErrorCode {
    #[error("The user rejected the request.")]
    UserRejectedRequest,
    #[error("The requested method and/or account has not been authorized by the user.")]
    Unauthorized,
    #[error("The provider does not support the requested method.")]
    UnsupportedMethod,
    #[error("The provider is disconnected from all chains.")]
    Disconnected,
    #[error("The provider is not connected to the requested chain.")]
    ChainDisconnected,
    /// Usually a request of the same kind is already pending in the wallet
    /// (e.g. the user has not answered a previous `eth_requestAccounts`).
    #[error("The requested resource is not available.")]
    ResourceUnavailable,
    #[error("Invalid method parameters.")]
    InvalidParams,
    #[error("An error occured during the execution of this API call.")]
    InternalError,
    #[error("Unknown error code `{0}'")]
    Unknown(i64),
}

impl ProviderErrorCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            4001 => Self::UserRejectedRequest,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 => Self::Disconnected,
            4901 => Self::ChainDisconnected,
            -32002 => Self::ResourceUnavailable,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            unknown => Self::Unknown(unknown),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::UserRejectedRequest => 4001,
            Self::Unauthorized => 4100,
            Self::UnsupportedMethod => 4200,
            Self::Disconnected => 4900,
            Self::ChainDisconnected => 4901,
            Self::ResourceUnavailable => -32002,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::Unknown(code) => *code,
        }
    }
}

/// Error returned by the wallet provider when a request fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Deserialize)]
#[error("{code} {message}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ProviderError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ProviderErrorCode::InternalError,
            message: message.into(),
            data: None,
        }
    }
}

/// A provider request issued while connecting failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("`{method}' request failed: {source}")]
pub struct ProviderQueryError {
    pub method: &'static str,
    #[source]
    pub source: ProviderError,
}

/// The wallet adapter could not build its wrapper around the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Wallet adapter failed: {0}")]
pub struct AdapterError(pub String);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectError {
    #[error("No injected wallet provider is available")]
    ProviderUnavailable,
    #[error("A wallet adapter is required to wrap the provider (e.g. an ethers or web3 binding)")]
    WalletAdapterRequired,
    #[error("The connector has been unmounted")]
    NotMounted,
    #[error("A connection attempt is already in progress")]
    AlreadyConnecting,
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    ProviderQuery(#[from] ProviderQueryError),
}

impl<'de> serde::Deserialize<'de> for ProviderErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = ProviderErrorCode;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "Expecting an integer ProviderErrorCode")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ProviderErrorCode::from_code(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v)
                    .map(ProviderErrorCode::from_code)
                    .map_err(|_| E::custom(format!("error code out of range: {v}")))
            }

            // javascript numbers all reach us as floats
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                    Ok(ProviderErrorCode::from_code(v as i64))
                } else {
                    Err(E::custom(format!("invalid error code: {v}")))
                }
            }
        }

        deserializer.deserialize_i64(Visitor)
    }
}
