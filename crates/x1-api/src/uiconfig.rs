// UI configuration endpoints
//
// The configuration revision uid is cheap to fetch and changes whenever the
// installation is reconfigured; the full document is only worth fetching
// again when it does.

use secrecy::SecretString;
use tracing::debug;

use crate::client::X1Client;
use crate::error::Error;
use crate::models::{UiConfig, UidResponse};

/// Optional sections of the uiconfig document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expand {
    /// `canRead` / `canWrite` / `canEvent` on every data point.
    DataPointFlags,
    /// Function parameters.
    Parameters,
    /// The location tree.
    Locations,
    /// The trade list.
    Trades,
}

impl Expand {
    pub const ALL: [Self; 4] = [
        Self::DataPointFlags,
        Self::Parameters,
        Self::Locations,
        Self::Trades,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataPointFlags => "dataPointFlags",
            Self::Parameters => "parameters",
            Self::Locations => "locations",
            Self::Trades => "trades",
        }
    }
}

impl X1Client {
    /// Fetch the current configuration revision.
    ///
    /// `GET api/v2/uiconfig/uid`
    pub async fn config_uid(&self, token: &SecretString) -> Result<String, Error> {
        let url = self.token_url("v2/uiconfig/uid", token)?;
        let resp: UidResponse = self.get_json(url).await?;
        Ok(resp.uid)
    }

    /// Fetch the full configuration document.
    ///
    /// `GET api/uiconfig[?expand=...]`
    pub async fn ui_config(
        &self,
        token: &SecretString,
        expand: &[Expand],
    ) -> Result<UiConfig, Error> {
        let mut url = self.token_url("uiconfig", token)?;
        if !expand.is_empty() {
            let joined = expand
                .iter()
                .map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(",");
            url.query_pairs_mut().append_pair("expand", &joined);
        }

        debug!(?expand, "fetching uiconfig");
        self.get_json(url).await
    }
}
