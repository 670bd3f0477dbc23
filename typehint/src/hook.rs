// hook.rs - Install handle for the interceptor
//
// The host's error channel is a process-wide singleton, so registration is
// tracked by a `HookRegistry` holding an atomic flag. `install` hands out an
// `InstallGuard`; the interceptor stays installed for as long as the guard
// lives. A second `install` while a guard is live fails and changes nothing.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use crate::context::CallContext;
use crate::handler::{handle, Outcome};
use crate::report::TypeContractViolation;
use crate::signal::ViolationSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InstallError {
    #[error("type-hint interceptor is already installed")]
    AlreadyInstalled,
}

/// Tracks whether the interceptor is registered with an error channel.
#[derive(Debug, Default)]
pub struct HookRegistry {
    installed: AtomicBool,
}

static GLOBAL: HookRegistry = HookRegistry::new();

impl HookRegistry {
    pub const fn new() -> Self {
        Self {
            installed: AtomicBool::new(false),
        }
    }

    /// The registry for the process-wide error channel.
    pub fn global() -> &'static HookRegistry {
        &GLOBAL
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Register the interceptor.
    pub fn install(&self) -> Result<InstallGuard<'_>, InstallError> {
        if self
            .installed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("interceptor already installed; ignoring second install");
            return Err(InstallError::AlreadyInstalled);
        }
        debug!("interceptor installed");
        Ok(InstallGuard { registry: self })
    }
}

/// Proof of installation. Dropping it uninstalls the interceptor.
#[derive(Debug)]
pub struct InstallGuard<'a> {
    registry: &'a HookRegistry,
}

impl InstallGuard<'_> {
    /// Entry point for the host's error channel.
    pub fn handle<C: CallContext + ?Sized>(
        &self,
        signal: &ViolationSignal,
        ctx: &C,
    ) -> Result<Outcome, TypeContractViolation> {
        handle(signal, ctx)
    }

    /// Uninstall explicitly.
    pub fn release(self) {}
}

impl Drop for InstallGuard<'_> {
    fn drop(&mut self) {
        self.registry.installed.store(false, Ordering::Release);
        debug!("interceptor released");
    }
}
