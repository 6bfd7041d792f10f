use std::fmt;
use std::time::Duration;

use super::error::ClientError;

pub const JSON: &str = "application/json";
pub const JSON_PATCH: &str = "application/json-patch+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request. The client fills in the authorization header.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::Get,
            url: url.into(),
            content_type: None,
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::Delete,
            ..HttpRequest::get(url)
        }
    }

    pub fn with_body(
        method: Method,
        url: impl Into<String>,
        content_type: &'static str,
        body: String,
    ) -> Self {
        HttpRequest {
            method,
            url: url.into(),
            content_type: Some(content_type),
            body: Some(body),
        }
    }
}

/// A response of any status. Non-2xx is not an error at this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP seam between the client and the network.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest, authorization: &str)
    -> Result<HttpResponse, ClientError>;
}

/// Production transport backed by a ureq agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .user_agent(concat!("workboard/", env!("CARGO_PKG_VERSION")))
            .build();
        UreqTransport { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        request: &HttpRequest,
        authorization: &str,
    ) -> Result<HttpResponse, ClientError> {
        let mut req = self
            .agent
            .request(request.method.as_str(), &request.url)
            .set("Authorization", authorization)
            .set("Accept", JSON);
        if let Some(content_type) = request.content_type {
            req = req.set("Content-Type", content_type);
        }

        let result = match &request.body {
            Some(body) => req.send_string(body),
            None => req.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(ClientError::Transport(err.to_string()));
            }
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
            self.responses.lock().unwrap().push_back(HttpResponse {
                status,
                body: body.into(),
            });
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(
            &self,
            request: &HttpRequest,
            _authorization: &str,
        ) -> Result<HttpResponse, ClientError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ClientError::Transport("no scripted response".into()))
        }
    }
}
