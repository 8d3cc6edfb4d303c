//! Intent classification for inbound greetings.
//!
//! [`classify`] and [`compose`] are pure: they never fail, never perform IO and
//! hold no state, so they are safe to call from any number of concurrent calls
//! without synchronization.

mod compose;

use std::fmt;

pub use compose::compose;

use crate::greeter_proto::ReplyIntent;
use crate::greeting::{Greeting, GreetingReply};

/// Names that are turned away regardless of age.
const REJECTED_NAME: &str = "Hitler";

/// The tone of a reply. This is a closed set; adding a member forces every
/// `match` over it, [`compose`] included, to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Welcome,
    Query,
    AskOut,
    GoodWish,
    Reject,
    /// Declared by the wire contract but never produced by [`classify`].
    /// Callers see it when a reply carries an intent value they do not know.
    Unrecognized,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Welcome,
        Intent::Query,
        Intent::AskOut,
        Intent::GoodWish,
        Intent::Reject,
        Intent::Unrecognized,
    ];

    /// The wire name of the intent, e.g. `ASK_OUT`.
    pub fn as_str(&self) -> &'static str {
        ReplyIntent::from(*self).as_str_name()
    }

    /// Decode a raw wire value. Values outside the contract map to
    /// [`Intent::Unrecognized`] instead of failing.
    pub fn from_wire(raw: i32) -> Self {
        ReplyIntent::try_from(raw)
            .map(Intent::from)
            .unwrap_or(Intent::Unrecognized)
    }

    pub fn to_wire(self) -> i32 {
        ReplyIntent::from(self).into()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Intent> for ReplyIntent {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Welcome => ReplyIntent::Welcome,
            Intent::Query => ReplyIntent::Query,
            Intent::AskOut => ReplyIntent::AskOut,
            Intent::GoodWish => ReplyIntent::GoodWish,
            Intent::Reject => ReplyIntent::Reject,
            Intent::Unrecognized => ReplyIntent::Unrecognized,
        }
    }
}

impl From<ReplyIntent> for Intent {
    fn from(intent: ReplyIntent) -> Self {
        match intent {
            ReplyIntent::Welcome => Intent::Welcome,
            ReplyIntent::Query => Intent::Query,
            ReplyIntent::AskOut => Intent::AskOut,
            ReplyIntent::GoodWish => Intent::GoodWish,
            ReplyIntent::Reject => Intent::Reject,
            ReplyIntent::Unrecognized => Intent::Unrecognized,
        }
    }
}

/// Map a greeting to exactly one [`Intent`].
///
/// Rules are checked in order and the first match wins:
/// 1. a name containing `"Hitler"` (case-sensitive) is rejected,
/// 2. `age < 10` gets a good wish (negative ages included),
/// 3. `age < 18` gets a query,
/// 4. `age < 40` gets asked out,
/// 5. everyone else is welcomed.
pub fn classify(greeting: &Greeting) -> Intent {
    if greeting.name.contains(REJECTED_NAME) {
        return Intent::Reject;
    }

    match greeting.age {
        ..10 => Intent::GoodWish,
        10..18 => Intent::Query,
        18..40 => Intent::AskOut,
        _ => Intent::Welcome,
    }
}

/// Classify then compose; the whole of what a responder does per call.
pub fn respond(greeting: &Greeting) -> GreetingReply {
    let intent = classify(greeting);
    GreetingReply {
        message: compose(greeting, intent),
        intent,
    }
}
