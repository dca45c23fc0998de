use tokio_util::sync::CancellationToken;

/// Cancels in-flight conversions on SIGINT (Ctrl+C) or SIGTERM.
///
/// Hand `token()` clones to the conversion; the binary codec checks the token
/// on every buffer read and write.
pub struct SignalHandler {
    token: CancellationToken,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Waits for SIGINT or SIGTERM, then cancels the token.
    pub async fn listen(&self) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT, cancelling conversion");
            }
            _ = Self::sigterm() => {
                tracing::info!("Received SIGTERM, cancelling conversion");
            }
        }
        self.token.cancel();
    }

    #[cfg(unix)]
    async fn sigterm() {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    async fn sigterm() {
        std::future::pending::<()>().await;
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_uncancelled_token() {
        let handler = SignalHandler::new();
        assert!(!handler.token().is_cancelled());
    }

    #[test]
    fn test_token_clones_share_state() {
        let handler = SignalHandler::default();
        let conversion = handler.token();
        handler.token.cancel();
        assert!(conversion.is_cancelled());
    }
}
