use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(thread_local_v2, js_namespace = ["window"], js_name = "ethereum")]
    pub static ETHEREUM: Option<Eip1193Provider>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, PartialEq)]
    pub type Eip1193Provider;

    /// Submit a JSON-RPC request to the provider. `args` is an object of the
    /// form `{ method: string, params?: unknown[] | object }`.
    ///
    /// The promise rejects with a `ProviderRpcError` (`{ code, message, data? }`).
    ///
    /// More details [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#request-1)
    #[wasm_bindgen(method, catch, js_name = "request")]
    pub async fn request(this: &Eip1193Provider, args: JsValue) -> Result<JsValue, JsValue>;

    /// Register a listener for one of the provider events (`"chainChanged"`,
    /// `"accountsChanged"`, `"connect"`, `"disconnect"`, `"message"`).
    #[wasm_bindgen(method, js_name = "on")]
    pub fn on(this: &Eip1193Provider, event: &str, listener: &js_sys::Function);

    /// Remove a listener previously registered with [`Eip1193Provider::on`]. The
    /// listener must be the same function object.
    #[wasm_bindgen(method, js_name = "removeListener")]
    pub fn remove_listener(this: &Eip1193Provider, event: &str, listener: &js_sys::Function);

    /// set by MetaMask, other wallets injecting `window.ethereum` may set it too
    #[wasm_bindgen(method, getter, js_name = "isMetaMask")]
    pub fn is_metamask(this: &Eip1193Provider) -> Option<bool>;
}
