use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;

/// Where the collection bucket lives.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Falls back to the default provider chain when unset.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores. Forces path-style addressing.
    pub endpoint_url: Option<String>,
}

/// Build an S3 client from the default credential chain.
pub async fn build_client(options: &ClientOptions) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &options.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
    if let Some(endpoint) = &options.endpoint_url {
        tracing::info!(endpoint = %endpoint, "using custom S3 endpoint");
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    Client::from_conf(builder.build())
}
