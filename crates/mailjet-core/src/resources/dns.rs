//! `mailjet_dns` data source

use super::{decode_document, encode_state};
use crate::diagnostics::Diagnostic;
use crate::engine::decode;
use crate::projection::DnsDataSourceModel;
use crate::records::DnsRecord;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::traits::{DataSource, Endpoint, RecordKey, RemoteClient};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const SUMMARY: &str = "Unable to read Mailjet DNS information";

/// DNS settings of a sending domain
#[derive(Clone)]
pub struct DnsDataSource {
    client: Arc<dyn RemoteClient>,
}

impl DnsDataSource {
    pub const TYPE_NAME: &'static str = "mailjet_dns";

    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for DnsDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsDataSource")
            .field("client", &self.client.client_name())
            .finish()
    }
}

fn computed_string(description: &str) -> Attribute {
    Attribute::computed(AttributeType::String).with_description(description)
}

#[async_trait]
impl DataSource for DnsDataSource {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let entry = BTreeMap::from([
            ("id".to_string(), Attribute::computed(AttributeType::Int64)),
            (
                "domain".to_string(),
                computed_string("The name of the domain linked to this DNS record."),
            ),
            (
                "ownership_token_record_name".to_string(),
                computed_string(
                    "Value to use when configuring the TXT record (DNS) verification for the domain.",
                ),
            ),
            (
                "ownership_token".to_string(),
                computed_string("Value of the token to verify the ownership of the domain."),
            ),
            (
                "spf_record_value".to_string(),
                computed_string("Value to insert in the DNS SPF record for this domain."),
            ),
            (
                "dkim_record_name".to_string(),
                computed_string("Name of the DNS DKIM record to insert for this domain."),
            ),
            (
                "dkim_record_value".to_string(),
                computed_string("Value to insert in the DNS DKIM record for this domain."),
            ),
        ]);

        Schema::new("DNS settings of a sending domain.")
            .with_attribute(
                "dns_id",
                Attribute::required(AttributeType::Int64)
                    .with_description("Unique numeric ID of the domain settings"),
            )
            .with_attribute(
                "entries",
                Attribute::computed(AttributeType::ListNested { attributes: entry }),
            )
    }

    async fn read(&self, config: &Value) -> Result<Value, Diagnostic> {
        let mut model: DnsDataSourceModel = decode_document(config, SUMMARY)?;
        debug!("Reading DNS settings #{}", model.dns_id);

        let records = self
            .client
            .get(Endpoint::DNS, &RecordKey::Id(model.dns_id))
            .await
            .map_err(|e| Diagnostic::error(SUMMARY, e.to_string()))?;
        let records: Vec<DnsRecord> =
            decode(records).map_err(|e| Diagnostic::error(SUMMARY, e.to_string()))?;

        model.refresh_from(&records);
        encode_state(&model, SUMMARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRemote;
    use serde_json::json;

    fn record() -> DnsRecord {
        DnsRecord {
            id: 5,
            domain: "example.com".to_string(),
            ownership_token_record_name: "mailjet._abc.example.com.".to_string(),
            ownership_token: "abc".to_string(),
            spf_record_value: "v=spf1 include:spf.mailjet.com ?all".to_string(),
            dkim_record_name: "mailjet._domainkey.example.com.".to_string(),
            dkim_record_value: "k=rsa; p=XYZ".to_string(),
            spf_status: Some("OK".to_string()),
            dkim_status: None,
        }
    }

    #[tokio::test]
    async fn read_lists_entries() {
        let remote = MemoryRemote::new();
        remote.insert_dns(record()).await;
        let source = DnsDataSource::new(Arc::new(remote));

        let state = source.read(&json!({"dns_id": 5})).await.unwrap();

        assert_eq!(state["dns_id"], json!(5));
        assert_eq!(
            state["entries"],
            json!([{
                "id": 5,
                "domain": "example.com",
                "ownership_token_record_name": "mailjet._abc.example.com.",
                "ownership_token": "abc",
                "spf_record_value": "v=spf1 include:spf.mailjet.com ?all",
                "dkim_record_name": "mailjet._domainkey.example.com.",
                "dkim_record_value": "k=rsa; p=XYZ"
            }])
        );
    }

    #[tokio::test]
    async fn unknown_domain_reports_diagnostic() {
        let source = DnsDataSource::new(Arc::new(MemoryRemote::new()));
        let diagnostic = source.read(&json!({"dns_id": 1})).await.unwrap_err();
        assert_eq!(diagnostic.summary, SUMMARY);
    }
}
