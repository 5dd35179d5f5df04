use async_trait::async_trait;
use tracing::{debug, info};

use hb_core::ports::{ComponentToggleError, ComponentTogglePort};

use super::wireless_debug::is_denial;
use crate::command::ShellEntry;

/// Boot-trigger component switch driven by `pm enable|disable`.
///
/// The current state is read from the `disabledComponents:` section of
/// `dumpsys package <pkg>`.
pub struct PackageManagerComponentToggle {
    shell: ShellEntry,
}

impl PackageManagerComponentToggle {
    pub fn new(shell: ShellEntry) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl ComponentTogglePort for PackageManagerComponentToggle {
    async fn set_enabled(
        &self,
        component: &str,
        enabled: bool,
    ) -> Result<(), ComponentToggleError> {
        let verb = if enabled { "enable" } else { "disable" };
        let output = self
            .shell
            .exec(&format!("pm {verb} {component}"))
            .await
            .map_err(|e| ComponentToggleError::Refused(format!("{e:#}")))?;

        let text = output.combined();
        if !output.success() || is_denial(&text) || text.contains("Exception") {
            return Err(ComponentToggleError::Refused(text));
        }
        info!(component, enabled, "boot component state changed");
        Ok(())
    }

    async fn is_enabled(&self, component: &str) -> Result<bool, ComponentToggleError> {
        let (package, class) = split_component(component)
            .ok_or_else(|| ComponentToggleError::Query(format!("invalid component: {component}")))?;

        let output = self
            .shell
            .exec(&format!("dumpsys package {package}"))
            .await
            .map_err(|e| ComponentToggleError::Query(format!("{e:#}")))?;
        if !output.success() {
            return Err(ComponentToggleError::Query(output.combined()));
        }

        let disabled = disabled_components(&output.stdout);
        let enabled = !disabled.iter().any(|name| *name == class);
        debug!(component, enabled, "boot component state read");
        Ok(enabled)
    }
}

/// Split `pkg/.Cls` or `pkg/full.Cls` into the package and the fully
/// qualified class name.
fn split_component(component: &str) -> Option<(&str, String)> {
    let (package, class) = component.split_once('/')?;
    if package.is_empty() || class.is_empty() {
        return None;
    }
    let class = match class.strip_prefix('.') {
        Some(relative) => format!("{package}.{relative}"),
        None => class.to_string(),
    };
    Some((package, class))
}

/// Class names listed under every `disabledComponents:` header.
fn disabled_components(dump: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut section_indent: Option<usize> = None;

    for line in dump.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.len() - trimmed.len();

        if let Some(header) = section_indent {
            if indent > header {
                names.push(trimmed.trim_end());
                continue;
            }
            section_indent = None;
        }
        if trimmed.trim_end() == "disabledComponents:" {
            section_indent = Some(indent);
        }
    }
    names
}
