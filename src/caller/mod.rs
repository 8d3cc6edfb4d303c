//! The calling side: connect to a responder, issue one `SayHello`, report the
//! outcome. There is no retry; a failed call is reported and left at that.

mod config;
mod error;

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub use config::{CallerConfig, DEFAULT_CONNECT_TIMEOUT};
pub use error::CallError;

use crate::greeter_proto::HelloRequest;
use crate::greeter_proto::greeter_client::GreeterClient;
use crate::greeting::{Greeting, GreetingReply};

/// A connected caller. Dropping it releases the connection.
#[derive(Debug, Clone)]
pub struct Caller {
    client: GreeterClient<Channel>,
    config: CallerConfig,
}

impl Caller {
    /// Open a connection to the configured responder.
    ///
    /// # Errors
    ///
    /// * [`CallError::InvalidEndpoint`] if the endpoint is not a valid URI
    /// * [`CallError::TransportUnavailable`] if nothing answers within the
    ///   connect timeout
    pub async fn connect(config: CallerConfig) -> Result<Self, CallError> {
        let uri = config.endpoint_uri();
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|source| CallError::InvalidEndpoint {
                endpoint: uri.clone(),
                source,
            })?
            .connect_timeout(config.connect_timeout);

        debug!(endpoint = %uri, "Connecting to responder");

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| CallError::unreachable(&e))?;

        Ok(Self {
            client: GreeterClient::new(channel),
            config,
        })
    }

    /// Send one greeting using the configured deadline, if any.
    pub async fn greet(
        &mut self,
        name: impl Into<String>,
        age: i32,
    ) -> Result<GreetingReply, CallError> {
        let deadline = self.config.deadline;
        self.greet_within(name, age, deadline).await
    }

    /// Send one greeting, giving up after `deadline`.
    ///
    /// The age is sent as-is, negative values included. Dropping the returned
    /// future abandons the call.
    pub async fn greet_within(
        &mut self,
        name: impl Into<String>,
        age: i32,
        deadline: Option<Duration>,
    ) -> Result<GreetingReply, CallError> {
        let greeting = Greeting::new(name, age);
        let span = info_span!("greet", call_id = %Uuid::new_v4());
        self.call(greeting, deadline).instrument(span).await
    }

    pub fn config(&self) -> &CallerConfig {
        &self.config
    }

    async fn call(
        &mut self,
        greeting: Greeting,
        deadline: Option<Duration>,
    ) -> Result<GreetingReply, CallError> {
        info!(
            name = %greeting.name,
            age = greeting.age,
            endpoint = %self.config.endpoint,
            "Attempting greeting"
        );

        let mut request = tonic::Request::new(HelloRequest::from(greeting));
        if let Some(deadline) = deadline {
            request.set_timeout(deadline);
        }

        let call = self.client.say_hello(request);
        let response = match deadline {
            Some(deadline) => tokio::time::timeout(deadline, call)
                .await
                .map_err(|_| CallError::DeadlineExceeded(deadline))?,
            None => call.await,
        };

        response
            .map(|reply| GreetingReply::from(reply.into_inner()))
            .map_err(|status| CallError::from_status(status, deadline))
    }
}

/// Connect, greet once, and release the connection.
pub async fn greet_once(
    config: CallerConfig,
    name: impl Into<String>,
    age: i32,
) -> Result<GreetingReply, CallError> {
    let mut caller = Caller::connect(config).await?;
    caller.greet(name, age).await
}

/// Log the outcome of a call. Failures are reported, never propagated.
pub fn report(outcome: &Result<GreetingReply, CallError>) {
    match outcome {
        Ok(reply) => info!(
            message = %reply.message,
            intent = %reply.intent,
            "[Success] Got reply"
        ),
        Err(e) => warn!(error = %e, "[Failure] Greeting failed"),
    }
}
