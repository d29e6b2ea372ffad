// Data-point value endpoints
//
// Reads address either a single data point or a whole function: the
// controller returns the values of every data point under the given uid.

use secrecy::SecretString;
use tracing::debug;

use crate::client::{X1Client, decode_json};
use crate::error::Error;
use crate::models::{
    SingleValue, ValueRecord, ValuesEnvelope, WireValue, WriteStatus, WriteStatusEnvelope,
};

impl X1Client {
    /// Read the current values under a data-point or function uid.
    ///
    /// `GET api/values/{uid}`
    pub async fn get_values(
        &self,
        token: &SecretString,
        uid: &str,
    ) -> Result<Vec<ValueRecord>, Error> {
        let url = self.token_url(&format!("values/{uid}"), token)?;
        let envelope: ValuesEnvelope = self.get_json(url).await?;
        debug!(uid, count = envelope.values.len(), "values received");
        Ok(envelope.values)
    }

    /// Write one data-point value.
    ///
    /// `PUT api/values/{uid}` with `{"value": ...}`. An empty response body
    /// is the normal success signal.
    pub async fn put_value(
        &self,
        token: &SecretString,
        uid: &str,
        value: &WireValue,
    ) -> Result<(), Error> {
        let url = self.token_url(&format!("values/{uid}"), token)?;
        let _ = self.put_json(url, &SingleValue { value }).await?;
        debug!(uid, "value written");
        Ok(())
    }

    /// Write several data-point values in one request.
    ///
    /// `PUT api/v2/values` with `{"values": [...]}`. The write is not atomic
    /// on the controller. Returns the per-uid statuses the controller
    /// reported, which is an empty list when it answered with an empty body.
    pub async fn put_values(
        &self,
        token: &SecretString,
        values: &[ValueRecord],
    ) -> Result<Vec<WriteStatus>, Error> {
        let url = self.token_url("v2/values", token)?;
        let body = ValuesEnvelope {
            values: values.to_vec(),
        };
        let resp = self.put_json(url, &body).await?;
        debug!(count = values.len(), "values written");

        if resp.trim().is_empty() {
            return Ok(Vec::new());
        }
        let envelope: WriteStatusEnvelope = decode_json(&resp)?;
        Ok(envelope.values)
    }
}
