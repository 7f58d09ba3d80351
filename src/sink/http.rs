use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;

use crate::server::ServerClient;
use crate::session::result::AttemptReport;
use crate::sink::{ResultSink, SinkError};

/// Posts outcomes to the game server: `POST {base}/api/result`.
pub struct HttpResultSink {
    server: Arc<ServerClient>,
    url: String,
}

impl HttpResultSink {
    pub fn new(server: Arc<ServerClient>) -> Self {
        let url = server.url("/api/result");
        Self { server, url }
    }
}

impl ResultSink for HttpResultSink {
    fn report(&self, report: &AttemptReport) -> Result<(), SinkError> {
        let body = serde_json::to_vec(report).map_err(|err| SinkError::Rejected(err.to_string()))?;
        let response = self
            .server
            .send(|client| {
                client
                    .post(&self.url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone())
            })
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SinkError::Rejected(format!("server answered {status}")))
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
