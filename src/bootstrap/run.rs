//! Command dispatch: one CLI command against the wired services.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

use hb_app::usecases::ToggleError;
use hb_core::ports::GrantPromptPort;
use hb_core::{
    BootMode, BootTarget, BootstrapOutcome, FallbackOutcome, GrantResult, RunId, UserDecision,
};

use crate::adapters::{FixedDecisionPrompt, StdinPrompt};
use crate::bootstrap::wiring::AppServices;
use crate::cli::Command;

#[derive(Serialize)]
struct StartReport<'a> {
    run_id: &'a RunId,
    outcome: BootstrapOutcome,
}

#[derive(Serialize)]
struct AbandonReport {
    /// A grant was pending and is now dropped.
    abandoned: bool,
}

#[derive(Serialize)]
struct ModeReport {
    target: BootTarget,
    enabled: bool,
    mode: BootMode,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run one command. Reports go to stdout as JSON; the exit code says
/// whether the command reached its goal.
pub async fn run_command(command: Command, services: &AppServices) -> anyhow::Result<ExitCode> {
    match command {
        Command::Start { timeout_secs } => {
            let budget = timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(services.bootstrap_timeout);
            start(services, budget).await
        }
        Command::Resume => {
            let report = services.reconciler.reconcile_on_resume().await?;
            print_json(&report)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Grant => {
            let result = services.reconciler.attempt_automatic_grant().await;
            print_json(&result)?;
            Ok(exit_code(!matches!(result, GrantResult::Failed(_))))
        }
        Command::RequestGrant { auto, manual } => {
            let prompt: Box<dyn GrantPromptPort> = if auto {
                Box::new(FixedDecisionPrompt(UserDecision::Automatic))
            } else if manual {
                Box::new(FixedDecisionPrompt(UserDecision::Manual))
            } else {
                Box::new(StdinPrompt)
            };
            let outcome = services
                .reconciler
                .request_with_fallback(prompt.as_ref())
                .await?;
            print_json(&outcome)?;
            Ok(exit_code(!matches!(
                outcome,
                FallbackOutcome::Automatic(GrantResult::Failed(_))
            )))
        }
        Command::AbandonGrant => {
            let abandoned = services.reconciler.abandon_pending_grant().await?;
            print_json(&AbandonReport { abandoned })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::BootMode { target, state } => {
            let target = BootTarget::from(target);
            let enabled = state.is_on();
            match services.toggle.set_mode(target, enabled).await {
                Ok(mode) => {
                    print_json(&ModeReport {
                        target,
                        enabled,
                        mode,
                    })?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(ToggleError::PermissionRequired(permission)) => {
                    warn!(%permission, "wireless boot needs a permission grant");
                    eprintln!(
                        "Permission {permission} is required for wireless boot. \
                         Run `helperboot request-grant` first."
                    );
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Status => {
            let view = services.status.snapshot().await?;
            print_json(&view)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Start the helper; Ctrl-C cancels the run.
async fn start(services: &AppServices, budget: Duration) -> anyhow::Result<ExitCode> {
    let handle = services.orchestrator.start(budget);
    info!(
        run_id = %handle.id(),
        budget_ms = budget.as_millis() as u64,
        "bootstrap requested"
    );

    let outcome = tokio::select! {
        outcome = handle.outcome() => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!(run_id = %handle.id(), "interrupted, cancelling bootstrap");
            handle.cancel();
            handle.outcome().await
        }
    };

    print_json(&StartReport {
        run_id: handle.id(),
        outcome,
    })?;
    Ok(exit_code(outcome.is_running()))
}
