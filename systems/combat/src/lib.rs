#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves projectile contact reports into destruction and capture commands.
//!
//! The world only detects overlaps; the gameplay consequence of a hit lives
//! here, so alternative rule sets (armor, multi-hit flags) can replace this
//! system without touching the simulation core.

use tank_battle_core::{Command, ContactTarget, Event};

/// Pure contact resolver. Stateless today; kept as a struct so rule state
/// (score, round tallies) has a home when it arrives.
#[derive(Debug, Default)]
pub struct Combat;

impl Combat {
    /// Creates a contact resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Translates every contact report in `events` into follow-up commands.
    ///
    /// A struck tank is destroyed, a struck flag is captured, and the
    /// projectile is spent either way. Commands land in submission order so
    /// the world resolves same-tick contacts in event order.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            let Event::ProjectileContact {
                projectile, target, ..
            } = event
            else {
                continue;
            };

            match target {
                ContactTarget::Tank(tank) => out.push(Command::DestroyTank { tank: *tank }),
                ContactTarget::Flag(flag) => out.push(Command::CaptureFlag { flag: *flag }),
            }
            out.push(Command::DespawnProjectile {
                projectile: *projectile,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tank_battle_core::{FlagId, ProjectileId, Side, TankId};

    #[test]
    fn tank_contact_destroys_and_spends_the_projectile() {
        let mut combat = Combat::new();
        let mut out = Vec::new();
        combat.handle(
            &[Event::ProjectileContact {
                projectile: ProjectileId::new(7),
                side: Side::Player,
                target: ContactTarget::Tank(TankId::new(2)),
            }],
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::DestroyTank {
                    tank: TankId::new(2)
                },
                Command::DespawnProjectile {
                    projectile: ProjectileId::new(7)
                },
            ]
        );
    }

    #[test]
    fn flag_contact_captures_and_spends_the_projectile() {
        let mut combat = Combat::new();
        let mut out = Vec::new();
        combat.handle(
            &[Event::ProjectileContact {
                projectile: ProjectileId::new(3),
                side: Side::Enemy,
                target: ContactTarget::Flag(FlagId::new(1)),
            }],
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::CaptureFlag {
                    flag: FlagId::new(1)
                },
                Command::DespawnProjectile {
                    projectile: ProjectileId::new(3)
                },
            ]
        );
    }

    #[test]
    fn unrelated_events_produce_nothing() {
        let mut combat = Combat::new();
        let mut out = Vec::new();
        combat.handle(
            &[Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(16),
            }],
            &mut out,
        );
        assert!(out.is_empty());
    }
}
