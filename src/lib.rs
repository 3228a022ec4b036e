/*!

# MetaMask Connector for EIP-1193 wallets

This library is meant to be used for web applications that need to connect to
the Ethereum wallet injected in the page (`window.ethereum`), e.g. MetaMask.
It keeps the application's state store up to date with the connection: the
network, the authorised accounts and whether the wallet is connected.

## Features

- Detect the injected wallet provider
- Request the network and the accounts
- Follow the chain and account changes of the wallet
- Plug any library binding (ethers, web3...) through a [`WalletAdapter`]

## Usage

Create a [`Connector`] over the injected provider and a [`Store`], then
connect:

```no_run
use metamask_connector::{AdapterArgs, Connector, InjectedProvider, MetaStore, Settings, adapter_fn};

/// your binding to a javascript library
#[derive(Clone)]
struct Web3 {
    provider: InjectedProvider,
}

# async fn test() -> anyhow::Result<()> {
let store = MetaStore::<Web3>::default();
let connector = Connector::injected(store.clone());

let adapter = adapter_fn(|args: AdapterArgs<InjectedProvider>| {
    Ok(Web3 {
        provider: args.provider().clone(),
    })
});
connector.connect(Some(&adapter), Settings::new()).await?;
# Ok(()) }
```

Connecting prompts the user to authorise the application if it has not been
authorised yet. The state is then available from the store or from
[`Connector::meta_state`], which also tells if a wallet was found at all:

```no_run
# use metamask_connector::{Connector, MetaStore};
# let connector = Connector::injected(MetaStore::<()>::default());
let meta_state = connector.meta_state();
if meta_state.is_available && meta_state.state.is_connected {
    println!("accounts: {:?}", meta_state.state.account);
}
```

*/

mod adapter;
pub mod chain;
mod connector;
pub mod error;
pub mod ffi;
mod guards;
mod injected;
pub mod provider;
pub mod store;
mod subscription;

pub use self::{
    adapter::{AdapterArgs, AdapterFn, Settings, WalletAdapter, adapter_fn},
    chain::{ChainInfo, Network},
    connector::{Connector, MetaState},
    error::ConnectError,
    injected::{InjectedProvider, ethereum},
    provider::Provider,
    store::{Action, ConnectionState, MetaStore, Store},
    subscription::Subscription,
};
