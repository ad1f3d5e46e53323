//! Health, energy, cooldown and medal counters.
//!
//! Health and energy are signed on purpose: an action may push them below
//! zero, and the outcome check turns a negative value into a defeat before
//! clamping it for reporting.

/// Health cap; a heal that would reach it is refused.
pub const MAX_HEALTH: i32 = 100;

/// Health restored by a heal pickup.
pub const HEAL_AMOUNT: i32 = 5;

/// Energy granted by a coffee pickup.
pub const COFFEE_ENERGY: i32 = 25;

/// Moves that must pass before another coffee is beneficial.
pub const COFFEE_COOLDOWN: u32 = 10;

/// Energy spent by every movement attempt.
pub const MOVE_COST: i32 = 1;

/// Snapshot of the values reported by `ResourceChanged` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSnapshot {
    /// Hero health.
    pub health: i32,
    /// Hero energy.
    pub energy: i32,
    /// Medals collected.
    pub medal_count: u32,
}

/// All per-session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceState {
    /// Hero health.
    pub health: i32,
    /// Hero energy.
    pub energy: i32,
    /// Medals collected so far.
    pub medal_count: u32,
    /// Medals placed at generation time.
    pub total_medals: u32,
    /// Moves remaining before coffee helps again.
    pub energy_usage_cooldown: u32,
    /// Movement intents since the last enemy spawn.
    pub steps_since_spawn: u32,
    /// Movement intents this session.
    pub total_steps: u32,
}

impl ResourceState {
    /// Create fresh counters.
    #[must_use]
    pub const fn new(health: i32, energy: i32, total_medals: u32) -> Self {
        Self {
            health,
            energy,
            medal_count: 0,
            total_medals,
            energy_usage_cooldown: 0,
            steps_since_spawn: 0,
            total_steps: 0,
        }
    }

    /// Values visible to the presentation layer.
    #[must_use]
    pub const fn snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            health: self.health,
            energy: self.energy,
            medal_count: self.medal_count,
        }
    }

    /// Check whether `cost` energy is available.
    #[must_use]
    pub const fn can_afford(&self, cost: i32) -> bool {
        self.energy >= cost
    }

    /// Spend energy without checking; callers that gate on energy check first.
    pub fn spend(&mut self, cost: i32) {
        self.energy -= cost;
    }

    /// Count down the coffee cooldown by one tick.
    pub fn tick_cooldown(&mut self) {
        self.energy_usage_cooldown = self.energy_usage_cooldown.saturating_sub(1);
    }

    /// Whether a coffee pickup would currently be refused.
    #[must_use]
    pub const fn coffee_blocked(&self) -> bool {
        self.energy_usage_cooldown > 0
    }

    /// Drink a coffee: more energy, cooldown restarts.
    pub fn drink_coffee(&mut self) {
        self.energy += COFFEE_ENERGY;
        self.energy_usage_cooldown = COFFEE_COOLDOWN;
    }

    /// A refused coffee escalates the cooldown further.
    pub fn extend_cooldown(&mut self) {
        self.energy_usage_cooldown += 1;
    }

    /// Whether a heal pickup would overheal.
    #[must_use]
    pub const fn heal_would_overflow(&self) -> bool {
        self.health + HEAL_AMOUNT >= MAX_HEALTH
    }

    /// Apply a heal pickup.
    pub fn heal(&mut self) {
        self.health += HEAL_AMOUNT;
    }

    /// Apply combat damage. Health may go negative.
    pub fn take_damage(&mut self, amount: u32) {
        self.health -= i32::try_from(amount).unwrap_or(i32::MAX);
    }

    /// Count a collected medal, returning `true` once all are collected.
    pub fn collect_medal(&mut self) -> bool {
        self.medal_count += 1;
        self.medal_count == self.total_medals
    }

    /// Clamp health and energy to zero after a defeat.
    pub fn clamp_after_defeat(&mut self) {
        self.health = self.health.max(0);
        self.energy = self.energy.max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resources() {
        let res = ResourceState::new(100, 500, 7);
        assert_eq!(res.health, 100);
        assert_eq!(res.energy, 500);
        assert_eq!(res.medal_count, 0);
        assert_eq!(res.total_medals, 7);
        assert_eq!(res.energy_usage_cooldown, 0);
    }

    #[test]
    fn test_coffee_cycle() {
        let mut res = ResourceState::new(100, 500, 0);
        assert!(!res.coffee_blocked());
        res.drink_coffee();
        assert_eq!(res.energy, 525);
        assert_eq!(res.energy_usage_cooldown, COFFEE_COOLDOWN);
        assert!(res.coffee_blocked());

        res.extend_cooldown();
        assert_eq!(res.energy_usage_cooldown, COFFEE_COOLDOWN + 1);

        for _ in 0..=COFFEE_COOLDOWN + 5 {
            res.tick_cooldown();
        }
        assert_eq!(res.energy_usage_cooldown, 0);
        assert!(!res.coffee_blocked());
    }

    #[test]
    fn test_heal_threshold() {
        let mut res = ResourceState::new(94, 500, 0);
        assert!(!res.heal_would_overflow());
        res.heal();
        assert_eq!(res.health, 99);
        assert!(res.heal_would_overflow());

        let res = ResourceState::new(95, 500, 0);
        assert!(res.heal_would_overflow(), "95 + 5 reaches the cap");
    }

    #[test]
    fn test_damage_can_go_negative_then_clamp() {
        let mut res = ResourceState::new(10, -3, 0);
        res.take_damage(24);
        assert_eq!(res.health, -14);
        res.clamp_after_defeat();
        assert_eq!(res.health, 0);
        assert_eq!(res.energy, 0);
    }

    #[test]
    fn test_collect_medal() {
        let mut res = ResourceState::new(100, 500, 2);
        assert!(!res.collect_medal());
        assert!(res.collect_medal());
        assert_eq!(res.medal_count, 2);
    }

    #[test]
    fn test_can_afford() {
        let mut res = ResourceState::new(100, 20, 0);
        assert!(res.can_afford(20));
        assert!(!res.can_afford(21));
        res.spend(20);
        assert_eq!(res.energy, 0);
    }
}
