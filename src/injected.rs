use crate::{
    Connector,
    error::{ProviderError, ProviderErrorCode},
    ffi,
    provider::{Provider, RequestArguments},
    store::Store,
    subscription::Subscription,
};
use serde::Serialize as _;
use wasm_bindgen::{JsCast as _, JsValue, closure::Closure};

const CHAIN_CHANGED: &str = "chainChanged";
const ACCOUNTS_CHANGED: &str = "accountsChanged";

/// The provider injected by the wallet extension in the page.
#[derive(Clone, PartialEq)]
pub struct InjectedProvider {
    eip1193: ffi::Eip1193Provider,
}

/// find the provider injected as `window.ethereum`
///
/// Returns `None` if no wallet extension injected an EIP-1193 provider. The
/// extensions may inject it late: make sure the page is fully loaded before
/// calling this function.
pub fn ethereum() -> Option<InjectedProvider> {
    ffi::eip1193::ETHEREUM.with(|ethereum| {
        // window.ethereum may have been set after the initial lookup
        let fresh = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("window"))
            .ok()
            .and_then(|win| js_sys::Reflect::get(&win, &JsValue::from_str("ethereum")).ok())
            .filter(|value| !value.is_undefined())
            .or_else(|| ethereum.clone().map(JsValue::from))?;

        if !looks_like_eip1193_provider(&fresh) {
            return None;
        }

        Some(InjectedProvider::new(ffi::Eip1193Provider::from(fresh)))
    })
}

fn looks_like_eip1193_provider(value: &JsValue) -> bool {
    if !value.is_object() {
        return false;
    }

    let has_function_property = |prop: &str| {
        js_sys::Reflect::get(value, &JsValue::from_str(prop))
            .ok()
            .map(|v| v.is_function())
            .unwrap_or(false)
    };

    has_function_property("request") && has_function_property("on")
}

fn decode_error(error: JsValue) -> ProviderError {
    serde_wasm_bindgen::from_value(error.clone()).unwrap_or_else(|decode_error| ProviderError {
        code: ProviderErrorCode::InternalError,
        message: format!("Couldn't decode the error content: {decode_error} ({error:?})"),
        data: None,
    })
}

impl InjectedProvider {
    fn new(eip1193: ffi::Eip1193Provider) -> Self {
        Self { eip1193 }
    }

    /// `true` if the injected provider identifies itself as MetaMask
    pub fn is_metamask(&self) -> bool {
        self.eip1193.is_metamask().unwrap_or(false)
    }

    /// access the raw bindings, e.g. to hand the provider to a javascript
    /// library
    pub fn as_ffi(&self) -> &ffi::Eip1193Provider {
        &self.eip1193
    }

    fn listen(&self, event: &'static str, listener: Closure<dyn Fn(JsValue)>) -> Subscription {
        tracing::trace!(event, "registering provider listener");
        self.eip1193.on(event, listener.as_ref().unchecked_ref());

        let eip1193 = self.eip1193.clone();
        Subscription::new(event, move || {
            eip1193.remove_listener(event, listener.as_ref().unchecked_ref());
        })
    }
}

#[async_trait::async_trait(?Send)]
impl Provider for InjectedProvider {
    async fn request(&self, args: RequestArguments) -> Result<serde_json::Value, ProviderError> {
        let js_args = args
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|error| {
                ProviderError::internal(format!("Couldn't encode the request: {error}"))
            })?;

        match self.eip1193.request(js_args).await {
            Ok(value) => serde_wasm_bindgen::from_value(value).map_err(|decode_error| {
                ProviderError::internal(format!("Couldn't decode the response: {decode_error}"))
            }),
            Err(error) => Err(decode_error(error)),
        }
    }

    fn on_chain_changed(&self, handler: Box<dyn Fn(String)>) -> Subscription {
        let listener = Closure::<dyn Fn(JsValue)>::new(move |chain_id: JsValue| {
            match chain_id.as_string() {
                Some(chain_id) => handler(chain_id),
                None => tracing::warn!(?chain_id, "ignoring invalid chainChanged event"),
            }
        });
        self.listen(CHAIN_CHANGED, listener)
    }

    fn on_accounts_changed(&self, handler: Box<dyn Fn(Vec<String>)>) -> Subscription {
        let listener = Closure::<dyn Fn(JsValue)>::new(move |accounts: JsValue| {
            match serde_wasm_bindgen::from_value::<Vec<String>>(accounts) {
                Ok(accounts) => handler(accounts),
                Err(error) => tracing::warn!(%error, "ignoring invalid accountsChanged event"),
            }
        });
        self.listen(ACCOUNTS_CHANGED, listener)
    }
}

impl<S: Store> Connector<InjectedProvider, S> {
    /// create a connector over `window.ethereum`
    ///
    /// If no provider was injected, the connector is unavailable for its
    /// whole lifetime: [`Connector::connect`] always fails with
    /// [`ConnectError::ProviderUnavailable`].
    ///
    /// [`ConnectError::ProviderUnavailable`]: crate::error::ConnectError::ProviderUnavailable
    pub fn injected(store: S) -> Self {
        Self::new(ethereum(), store)
    }
}
