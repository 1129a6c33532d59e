//! Unix signal bridge
//!
//! `kill -USR1 <pid>` starts the celebration from outside the terminal;
//! SIGTERM / SIGINT / SIGHUP shut the event loop down cleanly.

/// What the event loop should do in response to a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Celebrate,
    Shutdown,
}

#[cfg(unix)]
mod imp {
    use super::SignalAction;
    use anyhow::{Context, Result};
    use futures::stream::StreamExt;
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM, SIGUSR1};
    use signal_hook_tokio::{Handle, Signals};

    pub fn classify(signal: i32) -> Option<SignalAction> {
        match signal {
            SIGUSR1 => Some(SignalAction::Celebrate),
            SIGTERM | SIGINT | SIGHUP => Some(SignalAction::Shutdown),
            _ => None,
        }
    }

    pub struct SignalBridge {
        signals: Signals,
        handle: Handle,
    }

    impl SignalBridge {
        pub fn new() -> Result<Self> {
            let signals = Signals::new([SIGUSR1, SIGTERM, SIGINT, SIGHUP])
                .context("Failed to create signal handler")?;
            let handle = signals.handle();
            Ok(Self { signals, handle })
        }

        /// Wait for the next signal the application cares about
        pub async fn next(&mut self) -> Option<SignalAction> {
            while let Some(signal) = self.signals.next().await {
                tracing::info!("Received signal: {}", signal);
                if let Some(action) = classify(signal) {
                    return Some(action);
                }
            }
            None
        }

        pub fn close(self) {
            self.handle.close();
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::SignalAction;
    use anyhow::Result;

    /// No signal support on this platform; never yields
    pub struct SignalBridge;

    impl SignalBridge {
        pub fn new() -> Result<Self> {
            Ok(Self)
        }

        pub async fn next(&mut self) -> Option<SignalAction> {
            std::future::pending().await
        }

        pub fn close(self) {}
    }
}

pub use imp::SignalBridge;

#[cfg(all(test, unix))]
mod tests {
    use super::imp::classify;
    use super::*;
    use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1, SIGUSR2};

    #[test]
    fn test_classify() {
        assert_eq!(classify(SIGUSR1), Some(SignalAction::Celebrate));
        assert_eq!(classify(SIGTERM), Some(SignalAction::Shutdown));
        assert_eq!(classify(SIGINT), Some(SignalAction::Shutdown));
        assert_eq!(classify(SIGUSR2), None);
    }
}
