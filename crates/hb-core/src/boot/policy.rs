//! Pure boot-mode decision rules.
//!
//! Shared by the bootstrap orchestrator and the permission reconciler so
//! both apply identical rules. No I/O happens here.

use super::mode::{BootFlags, BootMode, BootTarget};

/// Side effect requested by a toggle, returned instead of performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleInstruction {
    /// Mode whose flag must be cleared before the toggled flag is written.
    pub clear: Option<BootMode>,
}

impl ToggleInstruction {
    pub fn none() -> Self {
        Self { clear: None }
    }

    /// Apply the instruction and the toggle itself to a set of flags.
    pub fn apply(&self, flags: BootFlags, target: BootTarget, turning_on: bool) -> BootFlags {
        let mut next = flags;
        match self.clear {
            Some(BootMode::LocalBoot) => next.local = false,
            Some(BootMode::WirelessBoot) => next.wireless = false,
            Some(BootMode::Disabled) | None => {}
        }
        next.set(target, turning_on);
        next
    }
}

pub struct StatePolicy;

impl StatePolicy {
    /// Resolve the effective boot mode from the raw flags and the OS state.
    ///
    /// Wireless requires its flag, the boot component and the permission.
    /// Local requires its flag, the boot component and no wireless flag.
    pub fn resolve_mode(
        local_flag: bool,
        wireless_flag: bool,
        component_enabled: bool,
        permission_granted: bool,
    ) -> BootMode {
        if wireless_flag && component_enabled && permission_granted {
            BootMode::WirelessBoot
        } else if local_flag && component_enabled && !wireless_flag {
            BootMode::LocalBoot
        } else {
            BootMode::Disabled
        }
    }

    pub fn resolve_flags(
        flags: BootFlags,
        component_enabled: bool,
        permission_granted: bool,
    ) -> BootMode {
        Self::resolve_mode(
            flags.local,
            flags.wireless,
            component_enabled,
            permission_granted,
        )
    }

    /// Mutual exclusion: turning one mode on always clears the other.
    pub fn on_mode_toggled(target: BootTarget, turning_on: bool) -> ToggleInstruction {
        if turning_on {
            ToggleInstruction {
                clear: Some(target.other().mode()),
            }
        } else {
            ToggleInstruction::none()
        }
    }

    /// Corrected flags for the current OS state.
    ///
    /// A wireless flag that lost its component or permission is dropped.
    /// While the boot component stays enabled the device falls back to
    /// local boot; otherwise it ends up disabled. Applying this twice
    /// yields the same flags as applying it once.
    pub fn reconcile(
        flags: BootFlags,
        component_enabled: bool,
        permission_granted: bool,
    ) -> BootFlags {
        let wireless = flags.wireless && component_enabled && permission_granted;
        let local = component_enabled && !wireless && (flags.local || flags.wireless);
        BootFlags { local, wireless }
    }

    /// Boot component state required after a toggle has been applied.
    pub fn component_required(flags: BootFlags) -> bool {
        flags.local || flags.wireless
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOLS: [bool; 2] = [false, true];

    #[test]
    fn wireless_requires_flag_component_and_permission() {
        for local in BOOLS {
            for wireless in BOOLS {
                for component in BOOLS {
                    for permission in BOOLS {
                        let mode =
                            StatePolicy::resolve_mode(local, wireless, component, permission);
                        let all_hold = wireless && component && permission;
                        assert_eq!(
                            mode == BootMode::WirelessBoot,
                            all_hold,
                            "local={local} wireless={wireless} component={component} permission={permission}"
                        );
                        if !all_hold {
                            let expected = if local && component && !wireless {
                                BootMode::LocalBoot
                            } else {
                                BootMode::Disabled
                            };
                            assert_eq!(mode, expected);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn local_needs_enabled_component() {
        assert_eq!(
            StatePolicy::resolve_mode(true, false, false, true),
            BootMode::Disabled
        );
        assert_eq!(
            StatePolicy::resolve_mode(true, false, true, false),
            BootMode::LocalBoot
        );
    }

    #[test]
    fn revoked_permission_with_both_flags_disables() {
        assert_eq!(
            StatePolicy::resolve_mode(true, true, true, false),
            BootMode::Disabled
        );
    }

    #[test]
    fn turning_on_clears_the_other_mode() {
        assert_eq!(
            StatePolicy::on_mode_toggled(BootTarget::Local, true).clear,
            Some(BootMode::WirelessBoot)
        );
        assert_eq!(
            StatePolicy::on_mode_toggled(BootTarget::Wireless, true).clear,
            Some(BootMode::LocalBoot)
        );
    }

    #[test]
    fn turning_off_clears_nothing() {
        assert_eq!(
            StatePolicy::on_mode_toggled(BootTarget::Local, false),
            ToggleInstruction::none()
        );
        assert_eq!(
            StatePolicy::on_mode_toggled(BootTarget::Wireless, false),
            ToggleInstruction::none()
        );
    }

    #[test]
    fn toggle_sequences_never_set_both_flags() {
        let steps = [
            (BootTarget::Local, true),
            (BootTarget::Local, false),
            (BootTarget::Wireless, true),
            (BootTarget::Wireless, false),
        ];

        // Every sequence of four toggles, starting from every initial state
        // that already satisfies the invariant.
        let starts = [
            BootFlags::new(false, false),
            BootFlags::new(true, false),
            BootFlags::new(false, true),
        ];
        for start in starts {
            for a in steps {
                for b in steps {
                    for c in steps {
                        for d in steps {
                            let mut flags = start;
                            for (target, on) in [a, b, c, d] {
                                let instruction = StatePolicy::on_mode_toggled(target, on);
                                flags = instruction.apply(flags, target, on);
                                assert!(
                                    !(flags.local && flags.wireless),
                                    "both flags set after {:?}",
                                    [a, b, c, d]
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn reconcile_drops_wireless_when_permission_revoked() {
        let corrected = StatePolicy::reconcile(BootFlags::new(false, true), true, false);
        assert_eq!(corrected, BootFlags::new(true, false));
        assert_eq!(
            StatePolicy::resolve_flags(corrected, true, false),
            BootMode::LocalBoot
        );
    }

    #[test]
    fn reconcile_disables_when_component_gone() {
        let corrected = StatePolicy::reconcile(BootFlags::new(false, true), false, true);
        assert_eq!(corrected, BootFlags::new(false, false));
    }

    #[test]
    fn reconcile_is_idempotent_and_exclusive() {
        for local in BOOLS {
            for wireless in BOOLS {
                for component in BOOLS {
                    for permission in BOOLS {
                        let flags = BootFlags::new(local, wireless);
                        let once = StatePolicy::reconcile(flags, component, permission);
                        let twice = StatePolicy::reconcile(once, component, permission);
                        assert_eq!(once, twice);
                        assert!(!(once.local && once.wireless));
                    }
                }
            }
        }
    }

    #[test]
    fn reconcile_keeps_consistent_flags() {
        let wireless = BootFlags::new(false, true);
        assert_eq!(StatePolicy::reconcile(wireless, true, true), wireless);

        let local = BootFlags::new(true, false);
        assert_eq!(StatePolicy::reconcile(local, true, false), local);
    }

    #[test]
    fn component_required_follows_flags() {
        assert!(!StatePolicy::component_required(BootFlags::default()));
        assert!(StatePolicy::component_required(BootFlags::new(true, false)));
        assert!(StatePolicy::component_required(BootFlags::new(false, true)));
    }
}
