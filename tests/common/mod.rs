//! Common fixtures for integration tests.

#![allow(dead_code)]

use queryflow::adapters::mock::MockHttpClient;
use queryflow::prelude::*;

pub const TEST_HOST: &str = "http://qf.test";
pub const TEST_KEY: &str = "test-api-key-12345";

/// Client over a fresh mock transport.
pub fn mock_client() -> QueryFlowClient<MockHttpClient> {
    QueryFlowClient::with_http_client(
        ClientConfig::new(TEST_HOST, TEST_KEY),
        MockHttpClient::new(),
    )
}

/// URL of a registered processor on the inference deployment.
pub fn processor_url(id: &str) -> String {
    format!("{}/v2/inference/{}", TEST_HOST, id)
}

/// URL for by-value executions on the inference deployment.
pub fn inference_url() -> String {
    format!("{}/v2/inference/", TEST_HOST)
}

/// Processor with a nested server and credential.
pub fn full_processor() -> Processor {
    Processor::new("chat")
        .with_config("model", "gpt-4o")
        .with_config("temperature", 0.2)
        .with_server(
            Server::new("openai")
                .with_config("base_url", "https://api.openai.com/v1")
                .with_credential(Credential::new("api_key").with_secret("key", "sk-test")),
        )
}

/// Processor without server.
pub fn template_processor(text: &str) -> Processor {
    Processor::new("template").with_config("text", text)
}
