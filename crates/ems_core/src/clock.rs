//! Simulated time, event kinds and the next-event selection rule.
//!
//! Time is measured in minutes since the incident. Instead of a queue of
//! scheduled events, the engine tracks one "next time" per event category in
//! [NextEventTimes]; the runner advances the [SimulationClock] to the earliest
//! of the three.

use bevy_ecs::prelude::Resource;

/// Simulated time in minutes since the incident began.
pub type SimTime = f64;

/// Sentinel for "nothing scheduled in this category".
pub const NEVER: SimTime = f64::INFINITY;

pub fn is_never(time: SimTime) -> bool {
    time == NEVER
}

/// Event categories. Declaration order is the tie-break priority when two
/// categories share the minimum time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum EventKind {
    /// An idle ambulance picks up a waiting patient at the scene.
    Pickup,
    /// An ambulance reaches its hospital and hands over the patient.
    Dropoff,
    /// A patient finishes treatment and leaves the hospital.
    Departure,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Pickup, EventKind::Dropoff, EventKind::Departure];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: SimTime,
    pub kind: EventKind,
}

/// The event currently being handled; inserted by the runner before the schedule runs.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Moves the clock forward to `timestamp`.
    pub fn advance_to(&mut self, timestamp: SimTime) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.now = timestamp;
    }
}

/// Earliest pending time per event category. A category with no eligible
/// entity holds [NEVER].
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct NextEventTimes {
    pub pickup: SimTime,
    pub dropoff: SimTime,
    pub departure: SimTime,
}

impl Default for NextEventTimes {
    fn default() -> Self {
        Self {
            pickup: NEVER,
            dropoff: NEVER,
            departure: NEVER,
        }
    }
}

impl NextEventTimes {
    pub fn time_of(&self, kind: EventKind) -> SimTime {
        match kind {
            EventKind::Pickup => self.pickup,
            EventKind::Dropoff => self.dropoff,
            EventKind::Departure => self.departure,
        }
    }

    /// Earliest event across the three categories, ties resolved
    /// pickup > dropoff > departure. `None` when every category is [NEVER].
    pub fn next_event(&self) -> Option<Event> {
        let mut best: Option<Event> = None;
        for kind in EventKind::ALL {
            let timestamp = self.time_of(kind);
            if is_never(timestamp) {
                continue;
            }
            match best {
                Some(current) if current.timestamp <= timestamp => {}
                _ => best = Some(Event { timestamp, kind }),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_event_picks_earliest_category() {
        let times = NextEventTimes {
            pickup: 12.0,
            dropoff: 3.5,
            departure: 90.0,
        };
        let event = times.next_event().expect("event");
        assert_eq!(event.kind, EventKind::Dropoff);
        assert_eq!(event.timestamp, 3.5);
    }

    #[test]
    fn ties_prefer_pickup_then_dropoff() {
        let all_tied = NextEventTimes {
            pickup: 5.0,
            dropoff: 5.0,
            departure: 5.0,
        };
        assert_eq!(all_tied.next_event().map(|e| e.kind), Some(EventKind::Pickup));

        let dropoff_departure = NextEventTimes {
            pickup: NEVER,
            dropoff: 5.0,
            departure: 5.0,
        };
        assert_eq!(
            dropoff_departure.next_event().map(|e| e.kind),
            Some(EventKind::Dropoff)
        );
    }

    #[test]
    fn all_never_yields_no_event() {
        assert!(NextEventTimes::default().next_event().is_none());
    }

    #[test]
    fn clock_advances_monotonically() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.now(), 0.0);
        clock.advance_to(1.5);
        clock.advance_to(1.5);
        clock.advance_to(91.5);
        assert_eq!(clock.now(), 91.5);
    }
}
