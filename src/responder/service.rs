use std::future::Future;
use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use crate::SHUTDOWN_MESSAGE;
use crate::greeter_proto::greeter_server::Greeter;
use crate::greeter_proto::{HelloReply, HelloRequest};
use crate::greeting::{Greeting, GreetingReply};
use crate::intent::respond;
use crate::responder::lifecycle::Lifecycle;
use crate::state_machine::lifecycle::Phase;

/// Status message for calls cut off when the grace period runs out.
pub const TERMINATED_MESSAGE: &str = "responder terminated before replying";

/// Produces the reply for one admitted greeting.
///
/// Implementations must not fail: every well-formed greeting gets a reply.
pub trait GreetingHandler: Send + Sync + 'static {
    fn handle(&self, greeting: Greeting) -> impl Future<Output = GreetingReply> + Send;
}

/// The production handler: classify the greeting, then compose the reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentResponder;

impl GreetingHandler for IntentResponder {
    fn handle(&self, greeting: Greeting) -> impl Future<Output = GreetingReply> + Send {
        std::future::ready(respond(&greeting))
    }
}

/// gRPC adapter that gates each call on the endpoint lifecycle before
/// delegating to a [`GreetingHandler`].
pub struct GreeterService<H> {
    handler: H,
    lifecycle: Arc<Lifecycle>,
}

impl<H: GreetingHandler> GreeterService<H> {
    pub fn new(handler: H, lifecycle: Arc<Lifecycle>) -> Self {
        Self { handler, lifecycle }
    }
}

#[tonic::async_trait]
impl<H: GreetingHandler> Greeter for GreeterService<H> {
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloReply>, Status> {
        let remote = request.remote_addr();

        let Some(_call) = self.lifecycle.try_admit() else {
            warn!(
                remote = ?remote,
                phase = %self.lifecycle.phase(),
                "Rejecting call, responder is not accepting requests"
            );
            return Err(Status::unavailable(SHUTDOWN_MESSAGE));
        };

        let greeting = Greeting::from(request.into_inner());
        debug!(remote = ?remote, name = %greeting.name, age = greeting.age, "Greeting received");

        let reply = tokio::select! {
            reply = self.handler.handle(greeting) => reply,
            () = self.lifecycle.wait_for(Phase::Stopped) => {
                warn!(remote = ?remote, "Call cut off, responder terminated");
                return Err(Status::unavailable(TERMINATED_MESSAGE));
            }
        };

        info!(intent = %reply.intent, "Replying");
        Ok(Response::new(reply.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;

    fn listening_service() -> GreeterService<IntentResponder> {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.bind();
        GreeterService::new(IntentResponder, lifecycle)
    }

    #[tokio::test]
    async fn test_say_hello_classifies_and_composes() {
        let service = listening_service();
        let reply = service
            .say_hello(Request::new(HelloRequest {
                name: "Bo".to_string(),
                age: 5,
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(reply.message, "Hey little Bo - continue to grow and prosper");
        assert_eq!(Intent::from_wire(reply.intent), Intent::GoodWish);
    }

    #[tokio::test]
    async fn test_say_hello_rejected_while_shutting_down() {
        let service = listening_service();
        service.lifecycle.request_stop();

        let status = service
            .say_hello(Request::new(HelloRequest {
                name: "Late".to_string(),
                age: 30,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), SHUTDOWN_MESSAGE);
    }

    struct Stalled;

    impl GreetingHandler for Stalled {
        fn handle(&self, _greeting: Greeting) -> impl Future<Output = GreetingReply> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn test_running_call_is_cut_off_on_terminate() {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.bind();
        let service = GreeterService::new(Stalled, Arc::clone(&lifecycle));

        let call = service.say_hello(Request::new(HelloRequest {
            name: "A".to_string(),
            age: 25,
        }));
        let terminate = async {
            tokio::task::yield_now().await;
            assert_eq!(lifecycle.in_flight(), 1);
            lifecycle.request_stop();
            lifecycle.terminate();
        };

        let (result, ()) = tokio::join!(call, terminate);

        let status = result.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), TERMINATED_MESSAGE);
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_call_is_released_after_reply() {
        let service = listening_service();
        let _ = service
            .say_hello(Request::new(HelloRequest {
                name: "Ann".to_string(),
                age: 25,
            }))
            .await
            .unwrap();
        assert_eq!(service.lifecycle.in_flight(), 0);
    }
}
