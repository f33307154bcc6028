//! IP echo lookup over HTTP.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use crate::config::LookupConfig;
use crate::lookup::{AddressLookup, Family};

/// Asks a plain-text echo service (`ifconfig.me/ip` by default) which
/// address the host connects from.
///
/// Each family gets its own client bound to the unspecified local address
/// of that family, so the connection can only go out over it.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    url: String,
    timeout: Duration,
}

impl HttpLookup {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            url: config.url.clone(),
            timeout: config.timeout(),
        }
    }

    fn client(&self, family: Family) -> reqwest::Result<reqwest::Client> {
        let local = match family {
            Family::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Family::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        };
        reqwest::Client::builder()
            .local_address(local)
            .timeout(self.timeout)
            .user_agent(concat!("panel-ip-debug/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    async fn fetch(&self, family: Family) -> reqwest::Result<String> {
        let response = self
            .client(family)?
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

impl AddressLookup for HttpLookup {
    fn lookup(&self, family: Family) -> impl Future<Output = Option<String>> + Send {
        async move {
            match self.fetch(family).await {
                Ok(body) => {
                    let address = body.trim();
                    if address.is_empty() {
                        tracing::warn!(%family, url = %self.url, "External lookup returned an empty body");
                        None
                    } else {
                        Some(address.to_string())
                    }
                }
                Err(e) => {
                    tracing::warn!(%family, url = %self.url, error = %e, "External lookup failed");
                    None
                }
            }
        }
    }
}
