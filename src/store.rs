use crate::chain::ChainInfo;
use std::{cell::RefCell, rc::Rc};

/// connection state shared with the rest of the application
///
/// `W` is the wrapper built by the [`WalletAdapter`] around the provider.
///
/// [`WalletAdapter`]: crate::WalletAdapter
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState<W> {
    pub web3: Option<W>,
    pub chain: Option<ChainInfo>,
    pub is_connected: bool,
    pub account: Vec<String>,
}

impl<W> Default for ConnectionState<W> {
    fn default() -> Self {
        Self {
            web3: None,
            chain: None,
            is_connected: false,
            account: Vec::new(),
        }
    }
}

/// State transitions emitted by the [`Connector`].
///
/// Serialized as `{ "type": "SET_CHAIN", "payload": { ... } }`.
///
/// [`Connector`]: crate::Connector
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action<W> {
    #[serde(rename = "SET_WEB3")]
    SetWeb3(W),
    #[serde(rename = "SET_CHAIN")]
    SetChain(ChainInfo),
    #[serde(rename = "SET_CONNECTED")]
    SetConnected(bool),
    #[serde(rename = "SET_ACCOUNT")]
    SetAccount(Vec<String>),
}

impl<W> Action<W> {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetWeb3(_) => "SET_WEB3",
            Action::SetChain(_) => "SET_CHAIN",
            Action::SetConnected(_) => "SET_CONNECTED",
            Action::SetAccount(_) => "SET_ACCOUNT",
        }
    }
}

impl<W> ConnectionState<W> {
    /// replace the field the action is about
    pub fn reduce(&mut self, action: Action<W>) {
        match action {
            Action::SetWeb3(web3) => self.web3 = Some(web3),
            Action::SetChain(chain) => self.chain = Some(chain),
            Action::SetConnected(is_connected) => self.is_connected = is_connected,
            Action::SetAccount(account) => self.account = account,
        }
    }
}

/// The application state store the [`Connector`] reads from and dispatches
/// to.
///
/// Dispatching must stay harmless when nobody listens to the store anymore:
/// a connection in progress keeps dispatching after the connector has been
/// unmounted.
///
/// [`Connector`]: crate::Connector
pub trait Store {
    type Wrapper: Clone;

    fn state(&self) -> ConnectionState<Self::Wrapper>;

    fn dispatch(&self, action: Action<Self::Wrapper>);
}

/// In memory [`Store`] applying [`ConnectionState::reduce`].
///
/// Cloning the store shares the same state.
#[derive(Debug)]
pub struct MetaStore<W> {
    state: Rc<RefCell<ConnectionState<W>>>,
}

impl<W> Clone for MetaStore<W> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<W> Default for MetaStore<W> {
    fn default() -> Self {
        Self::new(ConnectionState::default())
    }
}

impl<W> MetaStore<W> {
    pub fn new(state: ConnectionState<W>) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// reset the state to the initial, disconnected, state
    pub fn reset(&self) {
        *self.state.borrow_mut() = ConnectionState::default();
    }
}

impl<W: Clone> Store for MetaStore<W> {
    type Wrapper = W;

    fn state(&self) -> ConnectionState<W> {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: Action<W>) {
        self.state.borrow_mut().reduce(action);
    }
}
