use std::sync::Arc;

use crate::server::ServerClient;
use crate::source::{SourceError, WordEntry, WordSource};

/// Fetches session words from the game server: `GET {base}/api/session`.
pub struct HttpWordSource {
    server: Arc<ServerClient>,
    user_id: Option<u64>,
}

impl HttpWordSource {
    pub fn new(server: Arc<ServerClient>, user_id: Option<u64>) -> Self {
        Self { server, user_id }
    }

    pub fn session_url(&self) -> String {
        self.server.url("/api/session")
    }
}

impl WordSource for HttpWordSource {
    fn fetch_session_words(&mut self, dictionary: Option<u64>) -> Result<Vec<WordEntry>, SourceError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(user_id) = self.user_id {
            query.push(("user_id", user_id.to_string()));
        }
        if let Some(id) = dictionary {
            query.push(("dictionary_id", id.to_string()));
        }

        let url = self.session_url();
        let response = self
            .server
            .send(|client| client.get(&url).query(&query))
            .map_err(|err| SourceError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!("server answered {status}")));
        }

        let body = response
            .text()
            .map_err(|err| SourceError::Unavailable(err.to_string()))?;
        // The server encodes an empty session as `null`.
        let words: Option<Vec<WordEntry>> =
            serde_json::from_str(&body).map_err(|err| SourceError::Malformed(err.to_string()))?;
        Ok(words.unwrap_or_default())
    }

    fn describe(&self) -> String {
        format!("server {}", self.server.base_url())
    }
}
