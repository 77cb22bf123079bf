//! Line-oriented key-value server.
//!
//! Each input line is one request, `GET <key>` or `PUT <key> <value>`, and
//! produces one response line.

use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::config::{Config, EnvError};
use crate::datastore::{DataStore, StoreError};

/// Failures that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The environment did not describe a valid configuration.
    #[error(transparent)]
    Config(#[from] EnvError),
    /// Reading requests or writing responses failed.
    #[error("request stream failed: {0}")]
    Io(#[from] io::Error),
}

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Look up a key.
    Get(String),
    /// Store a value.
    Put(String, String),
}

impl Request {
    /// Parses one request line.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem for malformed lines.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.trim().splitn(3, ' ');
        let method = parts.next().unwrap_or_default().to_ascii_uppercase();
        let key = parts.next().filter(|key| !key.is_empty());
        match (method.as_str(), key, parts.next()) {
            ("GET", Some(key), None) => Ok(Self::Get(key.to_owned())),
            ("PUT", Some(key), Some(value)) => Ok(Self::Put(key.to_owned(), value.to_owned())),
            ("GET" | "PUT", ..) => Err(format!("malformed {method} request")),
            _ => Err(format!("unknown method {method:?}")),
        }
    }

    /// Request method in upper case.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Get(_) => "GET",
            Self::Put(..) => "PUT",
        }
    }
}

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The stored value.
    Value(String),
    /// The key is not set.
    NotFound,
    /// The value was stored.
    Stored,
    /// The request was refused.
    Rejected(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "OK {value}"),
            Self::NotFound => f.write_str("NOT_FOUND"),
            Self::Stored => f.write_str("STORED"),
            Self::Rejected(reason) => write!(f, "ERR {reason}"),
        }
    }
}

/// Serves requests against the configured store.
#[derive(Debug)]
pub struct Server {
    config: Config,
    store: Box<dyn DataStore>,
    served: u64,
}

impl Server {
    /// Builds the store selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the selected store is missing or
    /// fails to build.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let store = config.data_store.build()?;
        tracing::info!(
            address = %address(&config),
            store = store.name(),
            "server configured"
        );
        Ok(Self {
            config,
            store,
            served: 0,
        })
    }

    /// Loads the configuration from the environment and builds the server.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`] and [`Server::new`].
    pub fn from_env() -> Result<Self, ServerError> {
        Self::new(Config::from_env()?)
    }

    /// `host:port` the server is configured for.
    #[must_use]
    pub fn address(&self) -> String {
        address(&self.config)
    }

    /// Name of the backing store.
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Requests handled so far.
    #[must_use]
    pub const fn served(&self) -> u64 {
        self.served
    }

    fn exhausted(&self) -> bool {
        self.config
            .max_requests
            .is_some_and(|limit| self.served >= limit)
    }

    fn allows(&self, method: &str) -> bool {
        self.config
            .allowed_methods
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(method))
    }

    /// Handles one request line.
    pub fn handle(&mut self, line: &str) -> Response {
        self.served += 1;
        let request = match Request::parse(line) {
            Ok(request) => request,
            Err(reason) => return Response::Rejected(reason),
        };
        if !self.allows(request.method()) {
            return Response::Rejected(format!("method {} not allowed", request.method()));
        }
        if self.config.debug {
            tracing::debug!(?request, "handling request");
        }
        let outcome = match request {
            Request::Get(key) => self.store.get(&key).map(|value| {
                value.map_or(Response::NotFound, Response::Value)
            }),
            Request::Put(key, value) => self.store.put(&key, &value).map(|()| Response::Stored),
        };
        outcome.unwrap_or_else(|err: StoreError| Response::Rejected(err.to_string()))
    }

    /// Answers every line of `input` on `output` until the input ends or
    /// `MAX_REQUESTS` is reached. Returns the number of requests handled.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if reading or writing fails.
    pub fn serve<R, W>(&mut self, input: R, mut output: W) -> Result<u64, ServerError>
    where
        R: BufRead,
        W: Write,
    {
        let start = self.served;
        for line in input.lines() {
            if self.exhausted() {
                tracing::info!(served = self.served, "request limit reached");
                break;
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle(&line);
            writeln!(output, "{response}")?;
        }
        output.flush()?;
        Ok(self.served - start)
    }
}

fn address(config: &Config) -> String {
    format!("{}:{}", config.host, config.port)
}
