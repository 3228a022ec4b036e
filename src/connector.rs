use crate::{
    adapter::{AdapterArgs, Settings, WalletAdapter},
    chain::ChainInfo,
    error::ConnectError,
    guards::LifecycleGuards,
    provider::{Provider, query_accounts, query_network},
    store::{Action, ConnectionState, Store},
    subscription::Subscription,
};
use std::cell::RefCell;

/// The connection state of the store along with whether a provider is
/// available at all.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaState<W> {
    #[serde(flatten)]
    pub state: ConnectionState<W>,
    pub is_available: bool,
}

/// Connects the application [`Store`] to a wallet [`Provider`].
///
/// The provider is captured once, when the connector is created. Listeners
/// armed by [`Connector::connect`] are removed by [`Connector::disconnect`]
/// or when the connector is dropped.
pub struct Connector<P, S> {
    provider: Option<P>,
    store: S,
    guards: LifecycleGuards,
    subscriptions: RefCell<Vec<Subscription>>,
}

fn dispatch<S: Store>(store: &S, action: Action<S::Wrapper>) {
    tracing::debug!(action = action.kind(), "dispatching");
    store.dispatch(action);
}

impl<P, S: Store> Connector<P, S> {
    /// `provider` is `None` if no wallet provider was found, the connector
    /// is then unavailable for its whole lifetime.
    pub fn new(provider: Option<P>, store: S) -> Self {
        Self {
            provider,
            store,
            guards: LifecycleGuards::default(),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.guards.is_mounted()
    }

    pub fn is_connecting(&self) -> bool {
        self.guards.is_connecting()
    }

    /// `true` while the listeners of a previous connection are registered
    pub fn is_listening(&self) -> bool {
        !self.subscriptions.borrow().is_empty()
    }

    /// read the current state of the store, not cached
    pub fn meta_state(&self) -> MetaState<S::Wrapper> {
        MetaState {
            state: self.store.state(),
            is_available: self.is_available(),
        }
    }

    /// Tear down the connector: no new connection can be started afterward.
    ///
    /// A connection already in progress is not interrupted and will still
    /// dispatch to the store.
    pub fn unmount(&self) {
        tracing::debug!("unmounting connector");
        self.guards.unmount();
    }

    /// remove the `chainChanged` and `accountsChanged` listeners
    ///
    /// The connection state is left as is.
    pub fn disconnect(&self) {
        let subscriptions = self.subscriptions.take();
        drop(subscriptions);
    }
}

impl<P, S> Connector<P, S>
where
    P: Provider + Clone,
    S: Store + Clone + 'static,
{
    /// Connect to the wallet provider.
    ///
    /// The `adapter` wraps the provider (the `web3` of the state). It is
    /// called with the provider alone if `settings` is empty. Then the network
    /// and the accounts are requested, the latter may prompt the user. Each
    /// step is dispatched to the store as it completes and nothing is rolled
    /// back on failure.
    ///
    /// Once connected, the chain and account changes of the provider keep
    /// being dispatched to the store. Connecting again replaces those
    /// listeners.
    ///
    /// # Errors
    ///
    /// The preconditions are checked in this order:
    /// [`ConnectError::ProviderUnavailable`],
    /// [`ConnectError::WalletAdapterRequired`], [`ConnectError::NotMounted`]
    /// and [`ConnectError::AlreadyConnecting`]. Failures of the adapter or of
    /// the provider are returned as they are, without retrying.
    pub async fn connect(
        &self,
        adapter: Option<&dyn WalletAdapter<P, Wrapper = S::Wrapper>>,
        settings: Settings,
    ) -> Result<(), ConnectError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(ConnectError::ProviderUnavailable)?;
        let adapter = adapter.ok_or(ConnectError::WalletAdapterRequired)?;
        let _connecting = self.guards.begin()?;
        tracing::debug!("connecting to the wallet provider");

        let web3 = adapter.construct(AdapterArgs::new(provider.clone(), settings))?;
        dispatch(&self.store, Action::SetWeb3(web3));

        let chain = query_network(provider).await?;
        dispatch(&self.store, Action::SetChain(chain));

        let accounts = query_accounts(provider).await?;
        if !accounts.is_empty() {
            dispatch(&self.store, Action::SetConnected(true));
            dispatch(&self.store, Action::SetAccount(accounts));
        }

        self.arm_listeners(provider);
        tracing::debug!("connected to the wallet provider");
        Ok(())
    }

    fn arm_listeners(&self, provider: &P) {
        let store = self.store.clone();
        let chain_changed = provider.on_chain_changed(Box::new(move |chain_id: String| {
            match ChainInfo::from_hex(&chain_id) {
                Ok(chain) => dispatch(&store, Action::SetChain(chain)),
                Err(error) => tracing::warn!(%error, "ignoring chainChanged event"),
            }
        }));

        let store = self.store.clone();
        let accounts_changed =
            provider.on_accounts_changed(Box::new(move |accounts: Vec<String>| {
                if accounts.is_empty() {
                    dispatch(&store, Action::SetConnected(false));
                }
                dispatch(&store, Action::SetAccount(accounts));
            }));

        // dropping the previous subscriptions removes their listeners
        let previous = self
            .subscriptions
            .replace(vec![chain_changed, accounts_changed]);
        drop(previous);
    }
}
