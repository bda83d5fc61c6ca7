//! Slot occupancy bookkeeping for the hard constraints.
//!
//! Flat `slot × entity` grids answer "is this venue / referee / team free
//! in this slot" in O(1). Team-per-day counters back the optional daily cap.

/// A (slot, venue, referee) triple, by registry index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Placement {
    pub slot: usize,
    pub venue: usize,
    pub referee: usize,
}

impl Placement {
    pub fn new(slot: usize, venue: usize, referee: usize) -> Self {
        Self {
            slot,
            venue,
            referee,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Occupancy {
    venues: usize,
    referees: usize,
    teams: usize,
    venue_busy: Vec<bool>,
    referee_busy: Vec<bool>,
    team_busy: Vec<bool>,
    /// Matches per (day, team).
    team_day: Vec<u32>,
    day_of_slot: Vec<usize>,
    daily_cap: Option<u32>,
}

impl Occupancy {
    /// Creates an empty grid. `day_of_slot[s]` is the day index of slot `s`.
    pub fn new(
        teams: usize,
        venues: usize,
        referees: usize,
        day_of_slot: Vec<usize>,
        daily_cap: Option<u32>,
    ) -> Self {
        let slots = day_of_slot.len();
        let days = day_of_slot.iter().max().map_or(0, |d| d + 1);
        Self {
            venues,
            referees,
            teams,
            venue_busy: vec![false; slots * venues],
            referee_busy: vec![false; slots * referees],
            team_busy: vec![false; slots * teams],
            team_day: vec![0; days * teams],
            day_of_slot,
            daily_cap,
        }
    }

    /// Whether either team is unavailable in the slot (busy or at the daily cap).
    pub fn teams_blocked(&self, home: usize, away: usize, slot: usize) -> bool {
        if home == away {
            return true;
        }
        let day = self.day_of_slot[slot];
        [home, away].iter().any(|&t| {
            self.team_busy[slot * self.teams + t]
                || self
                    .daily_cap
                    .is_some_and(|cap| self.team_day[day * self.teams + t] >= cap)
        })
    }

    pub fn venue_free(&self, slot: usize, venue: usize) -> bool {
        !self.venue_busy[slot * self.venues + venue]
    }

    pub fn referee_free(&self, slot: usize, referee: usize) -> bool {
        !self.referee_busy[slot * self.referees + referee]
    }

    /// Whether a match between `home` and `away` fits at `p`.
    pub fn can_place(&self, home: usize, away: usize, p: Placement) -> bool {
        self.venue_free(p.slot, p.venue)
            && self.referee_free(p.slot, p.referee)
            && !self.teams_blocked(home, away, p.slot)
    }

    pub fn occupy(&mut self, home: usize, away: usize, p: Placement) {
        self.set(home, away, p, true);
    }

    pub fn release(&mut self, home: usize, away: usize, p: Placement) {
        self.set(home, away, p, false);
    }

    fn set(&mut self, home: usize, away: usize, p: Placement, busy: bool) {
        self.venue_busy[p.slot * self.venues + p.venue] = busy;
        self.referee_busy[p.slot * self.referees + p.referee] = busy;
        let day = self.day_of_slot[p.slot];
        for t in [home, away] {
            self.team_busy[p.slot * self.teams + t] = busy;
            let count = &mut self.team_day[day * self.teams + t];
            if busy {
                *count += 1;
            } else {
                *count = count.saturating_sub(1);
            }
        }
    }
}
