use crate::{
    chain::ChainInfo,
    error::{ProviderError, ProviderQueryError},
    subscription::Subscription,
};
use serde_json::Value;

pub const NET_VERSION: &str = "net_version";
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";

/// Arguments of the EIP-1193 `request` method.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RequestArguments {
    pub method: String,
    pub params: Vec<Value>,
}

impl RequestArguments {
    /// request without parameters
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }
}

/// An EIP-1193 wallet provider, e.g. the one injected by MetaMask as
/// `window.ethereum`.
///
/// Listeners stay registered for as long as the returned [`Subscription`] is
/// alive.
#[async_trait::async_trait(?Send)]
pub trait Provider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError>;

    /// listen to `chainChanged`, the handler receives the hexadecimal chain id
    fn on_chain_changed(&self, handler: Box<dyn Fn(String)>) -> Subscription;

    /// listen to `accountsChanged`
    fn on_accounts_changed(&self, handler: Box<dyn Fn(Vec<String>)>) -> Subscription;
}

/// get the chain the provider is currently connected to
pub async fn query_network<P>(provider: &P) -> Result<ChainInfo, ProviderQueryError>
where
    P: Provider + ?Sized,
{
    let query_error = |source| ProviderQueryError {
        method: NET_VERSION,
        source,
    };

    let chain_id = provider
        .request(RequestArguments::new(NET_VERSION))
        .await
        .map_err(query_error)?;

    match chain_id {
        Value::String(chain_id) => Ok(ChainInfo::new(chain_id)),
        Value::Number(chain_id) => Ok(ChainInfo::new(chain_id.to_string())),
        unexpected => Err(query_error(ProviderError::internal(format!(
            "Unexpected network version: {unexpected}"
        )))),
    }
}

/// request the accounts the user authorises the application to use
///
/// This may prompt the user in the wallet's own interface and only returns
/// once the user has answered. An empty list means no account was authorised.
pub async fn query_accounts<P>(provider: &P) -> Result<Vec<String>, ProviderQueryError>
where
    P: Provider + ?Sized,
{
    let query_error = |source| ProviderQueryError {
        method: ETH_REQUEST_ACCOUNTS,
        source,
    };

    let accounts = provider
        .request(RequestArguments::new(ETH_REQUEST_ACCOUNTS))
        .await
        .map_err(query_error)?;

    serde_json::from_value(accounts).map_err(|decode_error| {
        query_error(ProviderError::internal(format!(
            "Couldn't decode the accounts: {decode_error}"
        )))
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use futures::{channel::oneshot, executor::block_on};
    use serde_json::json;
    use std::{
        cell::RefCell,
        collections::VecDeque,
        rc::{Rc, Weak},
    };

    pub(crate) enum Reply {
        Ready(Result<Value, ProviderError>),
        Pending(oneshot::Receiver<Result<Value, ProviderError>>),
    }

    type Handlers<T> = RefCell<Vec<Option<Rc<dyn Fn(T)>>>>;

    #[derive(Default)]
    struct Inner {
        replies: RefCell<VecDeque<Reply>>,
        requests: RefCell<Vec<RequestArguments>>,
        chain_handlers: Handlers<String>,
        accounts_handlers: Handlers<Vec<String>>,
    }

    /// scripted provider: replies are consumed in the order they are queued
    #[derive(Clone, Default)]
    pub(crate) struct MockProvider {
        inner: Rc<Inner>,
    }

    impl MockProvider {
        pub(crate) fn reply(&self, result: Result<Value, ProviderError>) -> &Self {
            self.inner
                .replies
                .borrow_mut()
                .push_back(Reply::Ready(result));
            self
        }

        /// queue a reply that is only delivered once the returned sender is used
        pub(crate) fn reply_later(&self) -> oneshot::Sender<Result<Value, ProviderError>> {
            let (sender, receiver) = oneshot::channel();
            self.inner
                .replies
                .borrow_mut()
                .push_back(Reply::Pending(receiver));
            sender
        }

        pub(crate) fn methods(&self) -> Vec<String> {
            self.inner
                .requests
                .borrow()
                .iter()
                .map(|args| args.method.clone())
                .collect()
        }

        /// number of `chainChanged` and `accountsChanged` listeners registered
        pub(crate) fn listeners(&self) -> (usize, usize) {
            fn count<T: 'static>(handlers: &Handlers<T>) -> usize {
                handlers.borrow().iter().flatten().count()
            }
            (
                count(&self.inner.chain_handlers),
                count(&self.inner.accounts_handlers),
            )
        }

        pub(crate) fn emit_chain_changed(&self, chain_id: &str) {
            let handlers: Vec<_> = self
                .inner
                .chain_handlers
                .borrow()
                .iter()
                .flatten()
                .cloned()
                .collect();
            for handler in handlers {
                handler(chain_id.to_owned());
            }
        }

        pub(crate) fn emit_accounts_changed(&self, accounts: &[&str]) {
            let handlers: Vec<_> = self
                .inner
                .accounts_handlers
                .borrow()
                .iter()
                .flatten()
                .cloned()
                .collect();
            for handler in handlers {
                handler(accounts.iter().map(|s| s.to_string()).collect());
            }
        }

        fn listen<T: 'static>(
            &self,
            event: &'static str,
            handlers: fn(&Inner) -> &Handlers<T>,
            handler: Box<dyn Fn(T)>,
        ) -> Subscription {
            let index = {
                let mut handlers = handlers(&self.inner).borrow_mut();
                handlers.push(Some(Rc::from(handler)));
                handlers.len() - 1
            };
            let inner: Weak<Inner> = Rc::downgrade(&self.inner);
            Subscription::new(event, move || {
                if let Some(inner) = inner.upgrade() {
                    handlers(&inner).borrow_mut()[index] = None;
                }
            })
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Provider for MockProvider {
        async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
            self.inner.requests.borrow_mut().push(args);
            let reply = self.inner.replies.borrow_mut().pop_front();
            match reply {
                Some(Reply::Ready(result)) => result,
                Some(Reply::Pending(receiver)) => receiver
                    .await
                    .unwrap_or_else(|_| Err(ProviderError::internal("reply dropped"))),
                None => Err(ProviderError::internal("no reply queued")),
            }
        }

        fn on_chain_changed(&self, handler: Box<dyn Fn(String)>) -> Subscription {
            self.listen("chainChanged", |inner| &inner.chain_handlers, handler)
        }

        fn on_accounts_changed(&self, handler: Box<dyn Fn(Vec<String>)>) -> Subscription {
            self.listen("accountsChanged", |inner| &inner.accounts_handlers, handler)
        }
    }

    pub(crate) fn rejected() -> ProviderError {
        ProviderError {
            code: ProviderErrorCode::UserRejectedRequest,
            message: "User rejected the request.".to_owned(),
            data: None,
        }
    }

    #[test]
    fn network() {
        let provider = MockProvider::default();
        provider.reply(Ok(json!("4"))).reply(Ok(json!(42)));

        assert_eq!(
            block_on(query_network(&provider)).unwrap(),
            ChainInfo::new("4")
        );
        assert_eq!(
            block_on(query_network(&provider)).unwrap(),
            ChainInfo::new("42")
        );
        assert_eq!(provider.methods(), ["net_version", "net_version"]);
        assert!(provider.inner.requests.borrow()[0].params.is_empty());
    }

    #[test]
    fn network_failure_keeps_cause() {
        let provider = MockProvider::default();
        provider.reply(Err(rejected())).reply(Ok(json!(null)));

        assert_eq!(
            block_on(query_network(&provider)).unwrap_err(),
            ProviderQueryError {
                method: NET_VERSION,
                source: rejected(),
            }
        );

        let error = block_on(query_network(&provider)).unwrap_err();
        assert_eq!(error.source.code, ProviderErrorCode::InternalError);
    }

    #[test]
    fn accounts() {
        let provider = MockProvider::default();
        provider
            .reply(Ok(json!(["0xabc", "0xdef"])))
            .reply(Ok(json!([])))
            .reply(Err(rejected()))
            .reply(Ok(json!({ "accounts": [] })));

        assert_eq!(
            block_on(query_accounts(&provider)).unwrap(),
            ["0xabc", "0xdef"]
        );
        assert!(block_on(query_accounts(&provider)).unwrap().is_empty());
        assert_eq!(
            block_on(query_accounts(&provider)).unwrap_err().source,
            rejected()
        );
        let error = block_on(query_accounts(&provider)).unwrap_err();
        assert_eq!(error.method, ETH_REQUEST_ACCOUNTS);
        assert_eq!(error.source.code, ProviderErrorCode::InternalError);

        assert_eq!(provider.methods(), [ETH_REQUEST_ACCOUNTS; 4]);
    }
}
