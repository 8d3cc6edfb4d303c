use crate::greeter_proto::{HelloReply, HelloRequest};
use crate::intent::Intent;

/// A single greeting request: who is calling and how old they claim to be.
///
/// The name may be empty and the age may be negative; both are valid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub name: String,
    pub age: i32,
}

impl Greeting {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// The responder's answer to a [`Greeting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingReply {
    pub message: String,
    pub intent: Intent,
}

impl From<HelloRequest> for Greeting {
    fn from(req: HelloRequest) -> Self {
        Self {
            name: req.name,
            age: req.age,
        }
    }
}

impl From<Greeting> for HelloRequest {
    fn from(greeting: Greeting) -> Self {
        Self {
            name: greeting.name,
            age: greeting.age,
        }
    }
}

impl From<GreetingReply> for HelloReply {
    fn from(reply: GreetingReply) -> Self {
        Self {
            message: reply.message,
            intent: reply.intent.to_wire(),
        }
    }
}

impl From<HelloReply> for GreetingReply {
    fn from(reply: HelloReply) -> Self {
        Self {
            message: reply.message,
            intent: Intent::from_wire(reply.intent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_with_unknown_intent_decodes_as_unrecognized() {
        let wire = HelloReply {
            message: "hi".to_string(),
            intent: 42,
        };
        let reply = GreetingReply::from(wire);
        assert_eq!(reply.intent, Intent::Unrecognized);
        assert_eq!(reply.message, "hi");
    }

    #[test]
    fn test_negative_age_is_carried_to_the_wire() {
        let req = HelloRequest::from(Greeting::new("X", -5));
        assert_eq!(req.age, -5);
        assert_eq!(req.name, "X");
    }
}
