use anyhow::Result;
use dogstatsd::{Client, OptionsBuilder};

use crate::config::DatadogConfig;

pub fn create_metric(config: &DatadogConfig) -> Result<Client> {
    let datadog_url = format!("{}:{}", config.host, config.port);

    let options = OptionsBuilder::new()
        .to_addr(datadog_url)
        .namespace(config.namespace.clone())
        .build();

    Ok(Client::new(options)?)
}
