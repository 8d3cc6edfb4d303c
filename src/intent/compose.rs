use super::Intent;
use crate::greeting::Greeting;

/// Render the reply text for `greeting` under an already chosen `intent`.
///
/// The name is substituted as-is. Only [`Intent::Welcome`] reads the age.
pub fn compose(greeting: &Greeting, intent: Intent) -> String {
    let name = &greeting.name;
    match intent {
        Intent::Welcome => format!("Hello {name}! You are {} years old.", greeting.age),
        Intent::Query => format!("Good seeing you {name}. How is school treating you?"),
        Intent::AskOut => format!("Hey {name}! Can we go on a date?"),
        Intent::GoodWish => format!("Hey little {name} - continue to grow and prosper"),
        Intent::Reject => format!("Um...see you later {name}..."),
        Intent::Unrecognized => format!("There is nothing for you to see {name}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        let g = Greeting::new("N", 42);
        assert_eq!(compose(&g, Intent::Welcome), "Hello N! You are 42 years old.");
        assert_eq!(
            compose(&g, Intent::Query),
            "Good seeing you N. How is school treating you?"
        );
        assert_eq!(compose(&g, Intent::AskOut), "Hey N! Can we go on a date?");
        assert_eq!(
            compose(&g, Intent::GoodWish),
            "Hey little N - continue to grow and prosper"
        );
        assert_eq!(compose(&g, Intent::Reject), "Um...see you later N...");
        assert_eq!(
            compose(&g, Intent::Unrecognized),
            "There is nothing for you to see N."
        );
    }

    #[test]
    fn test_only_welcome_reads_age() {
        let young = Greeting::new("Kim", 3);
        let old = Greeting::new("Kim", 77);
        for intent in Intent::ALL {
            if intent == Intent::Welcome {
                assert_ne!(compose(&young, intent), compose(&old, intent));
            } else {
                assert_eq!(compose(&young, intent), compose(&old, intent));
            }
        }
    }

    #[test]
    fn test_negative_age_in_welcome() {
        let g = Greeting::new("Z", -7);
        assert_eq!(compose(&g, Intent::Welcome), "Hello Z! You are -7 years old.");
    }

    #[test]
    fn test_compose_is_repeatable() {
        let g = Greeting::new("Rae", 19);
        for intent in Intent::ALL {
            assert_eq!(compose(&g, intent), compose(&g, intent));
        }
    }
}
