use crate::error::AdapterError;

/// Settings forwarded to the [`WalletAdapter`] alongside the provider.
pub type Settings = serde_json::Map<String, serde_json::Value>;

/// What the [`WalletAdapter`] receives to build its wrapper.
///
/// Empty settings are never forwarded: the adapter is then given the
/// provider alone.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterArgs<P> {
    Provider(P),
    ProviderWithSettings(P, Settings),
}

impl<P> AdapterArgs<P> {
    pub(crate) fn new(provider: P, settings: Settings) -> Self {
        if settings.is_empty() {
            Self::Provider(provider)
        } else {
            Self::ProviderWithSettings(provider, settings)
        }
    }

    pub fn provider(&self) -> &P {
        match self {
            Self::Provider(provider) | Self::ProviderWithSettings(provider, _) => provider,
        }
    }

    pub fn settings(&self) -> Option<&Settings> {
        match self {
            Self::Provider(_) => None,
            Self::ProviderWithSettings(_, settings) => Some(settings),
        }
    }

    /// number of arguments the adapter is called with (1 or 2)
    pub fn arity(&self) -> usize {
        match self {
            Self::Provider(_) => 1,
            Self::ProviderWithSettings(..) => 2,
        }
    }

    pub fn into_parts(self) -> (P, Option<Settings>) {
        match self {
            Self::Provider(provider) => (provider, None),
            Self::ProviderWithSettings(provider, settings) => (provider, Some(settings)),
        }
    }
}

/// Builds the library specific wrapper (the `web3` of the connection state)
/// around the provider, e.g. a binding to ethers.js or web3.js.
///
/// The wrapper is never inspected by the [`Connector`], only stored.
///
/// [`Connector`]: crate::Connector
pub trait WalletAdapter<P> {
    type Wrapper;

    fn construct(&self, args: AdapterArgs<P>) -> Result<Self::Wrapper, AdapterError>;
}

/// [`WalletAdapter`] built from a closure, see [`adapter_fn`].
#[derive(Clone, Copy)]
pub struct AdapterFn<F> {
    f: F,
}

/// use a closure as a [`WalletAdapter`]
///
/// ```
/// use metamask_connector::{AdapterArgs, WalletAdapter as _, adapter_fn};
///
/// let adapter = adapter_fn(|args: AdapterArgs<()>| Ok(args.arity()));
///
/// assert_eq!(adapter.construct(AdapterArgs::Provider(())), Ok(1));
/// ```
pub fn adapter_fn<P, W, F>(f: F) -> AdapterFn<F>
where
    F: Fn(AdapterArgs<P>) -> Result<W, AdapterError>,
{
    AdapterFn { f }
}

impl<P, W, F> WalletAdapter<P> for AdapterFn<F>
where
    F: Fn(AdapterArgs<P>) -> Result<W, AdapterError>,
{
    type Wrapper = W;

    fn construct(&self, args: AdapterArgs<P>) -> Result<W, AdapterError> {
        (self.f)(args)
    }
}
