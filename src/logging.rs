use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const QUIET_DIRECTIVE: &str = "greeter_rpc=info,greeter_server=info,greeter_client=info,warn";
const VERBOSE_DIRECTIVE: &str = "greeter_rpc=debug,greeter_server=debug,greeter_client=debug,info";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        QUIET_DIRECTIVE
    }
}

/// Install the process-wide subscriber used by the binaries.
///
/// `RUST_LOG` takes precedence over `verbose`. Transport crates (tonic, h2,
/// hyper) only log warnings unless asked for more.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_default_scopes_info_to_this_crate() {
        let directive = default_directive(false);
        assert!(directive.starts_with("greeter_rpc=info"));
        assert!(directive.ends_with(",warn"));
        assert!(directive.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_verbose_default_parses() {
        assert!(default_directive(true).contains("greeter_rpc=debug"));
        assert!(default_directive(true).parse::<EnvFilter>().is_ok());
    }
}
