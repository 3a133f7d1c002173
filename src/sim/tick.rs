//! Session controller
//!
//! Two independent clocks drive a session. The frame ticker calls [`tick`] once
//! per rendered frame; a wall-clock interval calls [`clock_second`] once per
//! second with the handle it was armed with. Both no-op outside `Playing`.

use super::clock::TimerHandle;
use super::event::GameEvent;
use super::scoring::{HAZARD_CALLOUT, apply_damage, catch_points, streak_multiplier};
use super::spawn::spawn_object;
use super::state::{FallingObject, ObjectKind, Phase, Session, SessionStats};
use crate::input::InputFrame;

/// Enter `Playing` from any phase with a fresh session. Cancels the old
/// countdown before arming the returned one.
pub fn start(session: &mut Session) -> TimerHandle {
    session.clock.cancel();

    session.score = 0;
    session.streak = 0;
    session.time_remaining = session.tuning.session_seconds;
    session.stage = session.tuning.stage_for(session.time_remaining);
    session.prize_achieved = false;
    session.objects.clear();
    session.particles.clear();
    session.spawner.reset();
    session.announcer.reset();
    session.stats = SessionStats::default();
    session.frames = 0;
    session.vehicle.reset(session.tuning.world_width / 2.0);

    session.phase = Phase::Playing;
    let handle = session.clock.arm();
    session.events.push(GameEvent::SessionStarted {
        seconds: session.time_remaining,
    });
    log::info!(
        "Session started: {}s on the clock (seed {})",
        session.time_remaining,
        session.seed
    );
    handle
}

/// Advance one frame. `dt` is in 60 Hz frame units (1.0 = one frame).
pub fn tick(session: &mut Session, input: &InputFrame, dt: f32) {
    if session.phase != Phase::Playing {
        return;
    }
    session.frames += 1;

    session
        .vehicle
        .update(input.mode(), dt, &session.tuning);

    let interval = session.tuning.spawn_interval(session.stage);
    if session.spawner.update(dt, interval) {
        let object = spawn_object(
            &mut session.rng,
            &session.assets.pools,
            &session.tuning,
            session.stage,
        );
        session.objects.insert(object);
    }

    let catch_box = session.vehicle.body_bounds();
    let gravity = session.tuning.gravity;
    let glow = session.tuning.hazard_glow_padding;
    let world_height = session.tuning.world_height;

    let mut hits = Vec::new();
    let mut missed = Vec::new();
    for (handle, object) in session.objects.iter_mut() {
        object.update(dt, gravity);
        if object.bounds(glow).intersects(&catch_box) {
            hits.push(handle);
        } else if object.is_offscreen(world_height, glow) {
            missed.push(handle);
        }
    }

    for handle in missed {
        if session.objects.remove(handle).is_some() {
            session.stats.misses += 1;
        }
    }
    // A prize pause freezes the frame at the hit that triggered it. Later hits
    // stay in the arena and resolve on the first frame after continuing.
    for handle in hits {
        if session.phase != Phase::Playing {
            break;
        }
        if let Some(object) = session.objects.remove(handle) {
            resolve_hit(session, object);
        }
    }
    if session.phase != Phase::Playing {
        return;
    }

    let cap = session
        .settings
        .max_ambient_particles(session.tuning.ambient_max);
    session
        .particles
        .update(&mut session.fx_rng, dt, &session.tuning, cap);
}

/// One wall-clock second elapsed on the interval armed as `handle`.
/// Returns false when the tick was stale or the session is not running.
pub fn clock_second(session: &mut Session, handle: TimerHandle) -> bool {
    if session.phase != Phase::Playing || !session.clock.is_live(handle) {
        return false;
    }

    session.time_remaining = session.time_remaining.saturating_sub(1);

    let stage = session
        .tuning
        .stage_for(session.time_remaining)
        .max(session.stage);
    if stage != session.stage {
        session.stage = stage;
        session.events.push(GameEvent::StageChanged { stage });
        log::info!(
            "Speed stage {} at {}s remaining",
            stage + 1,
            session.time_remaining
        );
    }

    if session.time_remaining == 0 {
        end(session);
    }
    true
}

/// Leave the prize pause. Returns the newly armed countdown, or `None` if the
/// session was not paused.
pub fn continue_play(session: &mut Session) -> Option<TimerHandle> {
    if session.phase != Phase::Paused {
        return None;
    }
    session.phase = Phase::Playing;
    let handle = session.clock.arm();
    session.events.push(GameEvent::Resumed);
    log::info!("Resumed with {}s remaining", session.time_remaining);
    Some(handle)
}

fn end(session: &mut Session) {
    session.clock.cancel();
    session.phase = Phase::Ended;
    session.events.push(GameEvent::SessionEnded {
        score: session.score,
    });
    log::info!(
        "Session over: score {} ({} caught, {} hazards, best streak {})",
        session.score,
        session.stats.catches,
        session.stats.hazards_hit,
        session.stats.best_streak
    );
}

fn resolve_hit(session: &mut Session, object: FallingObject) {
    match object.kind {
        ObjectKind::Good => {
            session.streak += 1;
            session.stats.catches += 1;
            session.stats.best_streak = session.stats.best_streak.max(session.streak);

            let multiplier = streak_multiplier(session.streak, &session.tuning);
            let points = catch_points(object.value, multiplier);
            session.score += points;

            session.events.push(GameEvent::Caught {
                label: object.label.clone(),
                points,
                multiplier,
                streak: session.streak,
            });
            let text = session.announcer.next_callout();
            session.events.push(GameEvent::Callout { text });
        }
        ObjectKind::Hazard => {
            session.score = apply_damage(session.score, object.value);
            session.streak = 0;
            session.stats.hazards_hit += 1;

            session.events.push(GameEvent::HazardHit {
                label: object.label.clone(),
                damage: object.value,
            });
            if session.settings.effective_screen_shake() {
                session.events.push(GameEvent::ScreenShake {
                    intensity: session.tuning.shake_intensity,
                });
            }
            session.events.push(GameEvent::Callout {
                text: HAZARD_CALLOUT,
            });
        }
    }

    if session.settings.particles {
        session.particles.burst(
            &mut session.fx_rng,
            object.pos,
            object.tint,
            session.tuning.burst_count,
            &session.tuning,
        );
    }
    session.events.push(GameEvent::Burst {
        pos: object.pos,
        color: object.tint,
        kind: object.kind,
    });

    check_prize(session);
}

/// First crossing of the prize threshold pauses play and stops the clock
fn check_prize(session: &mut Session) {
    if session.prize_achieved
        || session.phase != Phase::Playing
        || session.score < session.tuning.prize_threshold
    {
        return;
    }
    session.prize_achieved = true;
    session.phase = Phase::Paused;
    session.clock.cancel();
    session.events.push(GameEvent::PrizeUnlocked {
        score: session.score,
    });
    log::info!("Prize unlocked at {} points", session.score);
}
