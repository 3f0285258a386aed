use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::auth::{ConsentBroker, ConsentDecision, ConsentRequest},
};

/// Consent broker for interactive single-operator deployments: prints the
/// consent URL and reads a y/N answer. The read runs on a blocking thread so
/// the executor keeps serving other requests.
pub struct TerminalConsentBroker;

#[async_trait]
impl ConsentBroker for TerminalConsentBroker {
    async fn await_decision(&self, request: ConsentRequest) -> AppResult<ConsentDecision> {
        let granted = tokio::task::spawn_blocking(move || -> io::Result<bool> {
            let mut stdout = io::stdout();
            writeln!(
                stdout,
                "Consent required. Open this URL in a browser and grant access:"
            )?;
            writeln!(stdout, "{}", request.consent_url)?;
            write!(stdout, "Was consent granted? [y/N] ")?;
            stdout.flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(matches!(
                line.trim().to_ascii_lowercase().as_str(),
                "y" | "yes"
            ))
        })
        .await
        .map_err(|e| AppError::Internal(format!("consent prompt task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("consent prompt I/O failed: {e}")))?;

        Ok(if granted {
            ConsentDecision::Granted
        } else {
            ConsentDecision::Denied
        })
    }
}
