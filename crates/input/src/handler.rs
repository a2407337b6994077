//! NES auto-repeat (DAS) input model.
//!
//! The model is frame-driven: the owner calls [`AutoRepeat::handle_frame`]
//! once per logical frame and forwards discrete press/release events as they
//! arrive. Movement is delegated to a [`PieceMover`], so the model never
//! touches the board directly.

use serde::{Deserialize, Serialize};

use crate::types::{
    Direction, DEFAULT_DAS_CHARGED_FLOOR, DEFAULT_DAS_CHARGE_AFTER_TAP, DEFAULT_DAS_TRIGGER,
    DEFAULT_DAS_WALL_CHARGE,
};

/// Movement seam between the auto-repeat model and the game.
pub trait PieceMover {
    /// Shift the active piece one column. Returns false when blocked.
    fn shift(&mut self, direction: Direction) -> bool;

    /// Push the active piece down one row. When the piece cannot move it
    /// locks; `cells_soft_dropped` is the pushdown credited for that lock.
    /// Returns false if the piece locked.
    fn push_down(&mut self, cells_soft_dropped: u32) -> bool;
}

/// What to do with the DAS charge when a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockChargePolicy {
    /// Keep the charge but never above the wall charge.
    #[default]
    Cap,
    /// Set the charge to the wall charge.
    Rearm,
}

/// DAS speed presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DasSpeed {
    #[default]
    Standard,
    SlowMedium,
    Medium,
    Fast,
    FastDas,
}

impl DasSpeed {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "standard" => Some(DasSpeed::Standard),
            "slowmedium" => Some(DasSpeed::SlowMedium),
            "medium" => Some(DasSpeed::Medium),
            "fast" => Some(DasSpeed::Fast),
            "fastdas" => Some(DasSpeed::FastDas),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DasSpeed::Standard => "standard",
            DasSpeed::SlowMedium => "slowMedium",
            DasSpeed::Medium => "medium",
            DasSpeed::Fast => "fast",
            DasSpeed::FastDas => "fastDas",
        }
    }

    /// `(trigger_threshold, charged_floor, wall_charge)`
    fn thresholds(self) -> (u32, u32, u32) {
        match self {
            DasSpeed::Standard => (DEFAULT_DAS_TRIGGER, DEFAULT_DAS_CHARGED_FLOOR, DEFAULT_DAS_WALL_CHARGE),
            DasSpeed::SlowMedium => (16, 11, 11),
            DasSpeed::Medium => (16, 12, 12),
            DasSpeed::Fast => (16, 13, 13),
            DasSpeed::FastDas => (6, 2, 6),
        }
    }
}

/// How the charge carries across pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DasBehavior {
    /// Console behavior: the charge carries over, capped at the wall charge.
    #[default]
    Standard,
    /// Taps never drain the charge and every piece starts charged.
    AlwaysCharged,
    /// Every piece starts fully charged.
    ChargeOnPieceSpawn,
}

impl DasBehavior {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "standard" => Some(DasBehavior::Standard),
            "alwayscharged" => Some(DasBehavior::AlwaysCharged),
            "chargeonpiecespawn" => Some(DasBehavior::ChargeOnPieceSpawn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DasBehavior::Standard => "standard",
            DasBehavior::AlwaysCharged => "alwaysCharged",
            DasBehavior::ChargeOnPieceSpawn => "chargeOnPieceSpawn",
        }
    }
}

/// Charge thresholds, all measured in frames of charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DasSettings {
    pub trigger_threshold: u32,
    pub charged_floor: u32,
    pub charge_after_tap: u32,
    pub wall_charge: u32,
    pub lock_policy: LockChargePolicy,
}

impl DasSettings {
    pub fn preset(speed: DasSpeed, behavior: DasBehavior) -> Self {
        let (trigger, floor, wall) = speed.thresholds();
        match behavior {
            DasBehavior::Standard => Self {
                trigger_threshold: trigger,
                charged_floor: floor,
                charge_after_tap: DEFAULT_DAS_CHARGE_AFTER_TAP,
                wall_charge: wall,
                lock_policy: LockChargePolicy::Cap,
            },
            DasBehavior::AlwaysCharged => Self {
                trigger_threshold: trigger,
                charged_floor: floor,
                charge_after_tap: floor,
                wall_charge: trigger,
                lock_policy: LockChargePolicy::Rearm,
            },
            DasBehavior::ChargeOnPieceSpawn => Self {
                trigger_threshold: trigger,
                charged_floor: floor,
                charge_after_tap: DEFAULT_DAS_CHARGE_AFTER_TAP,
                wall_charge: trigger,
                lock_policy: LockChargePolicy::Rearm,
            },
        }
    }

    /// Every charge level must sit inside `[0, trigger_threshold]`.
    pub fn is_consistent(&self) -> bool {
        self.trigger_threshold > 0
            && self.charged_floor <= self.trigger_threshold
            && self.charge_after_tap <= self.trigger_threshold
            && self.wall_charge <= self.trigger_threshold
    }
}

impl Default for DasSettings {
    fn default() -> Self {
        Self::preset(DasSpeed::Standard, DasBehavior::Standard)
    }
}

/// Result of one [`AutoRepeat::handle_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatAction {
    /// Nothing held.
    Idle,
    /// More than one d-pad direction held; nothing moves.
    Conflict,
    SoftDropped,
    /// Soft drop hit the stack and the piece locked.
    Locked,
    /// Soft drop is active but skipped this frame.
    SoftDropWait,
    Charging,
    Shifted,
    /// The charge hit the trigger but the piece was against a wall.
    WallCharged,
}

/// Held-key state and DAS charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRepeat {
    settings: DasSettings,
    left_held: bool,
    right_held: bool,
    down_held: bool,
    soft_dropping: bool,
    cells_soft_dropped: u32,
    soft_dropped_last_frame: bool,
    charge: u32,
}

impl AutoRepeat {
    pub fn new() -> Self {
        Self::with_settings(DasSettings::default())
    }

    pub fn with_settings(settings: DasSettings) -> Self {
        Self {
            settings,
            left_held: false,
            right_held: false,
            down_held: false,
            soft_dropping: false,
            cells_soft_dropped: 0,
            soft_dropped_last_frame: false,
            // The first piece starts charged.
            charge: settings.trigger_threshold,
        }
    }

    pub fn settings(&self) -> DasSettings {
        self.settings
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    pub fn cells_soft_dropped(&self) -> u32 {
        self.cells_soft_dropped
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left_held,
            Direction::Right => self.right_held,
        }
    }

    pub fn is_down_held(&self) -> bool {
        self.down_held
    }

    /// Forget held keys and soft drop, and recharge to the trigger.
    pub fn reset(&mut self) {
        *self = Self::with_settings(self.settings);
    }

    pub fn press(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.left_held = true,
            Direction::Right => self.right_held = true,
        }
    }

    pub fn release(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.left_held = false,
            Direction::Right => self.right_held = false,
        }
    }

    pub fn press_down(&mut self) {
        self.down_held = true;
    }

    /// Releasing down stops soft drop in any phase.
    pub fn release_down(&mut self) {
        self.down_held = false;
        self.soft_dropping = false;
        self.cells_soft_dropped = 0;
    }

    /// Begin soft dropping. The owner only calls this while the piece is falling.
    pub fn start_soft_drop(&mut self) {
        self.soft_dropping = true;
    }

    /// Handle the initial press of a direction: reset the charge and shift once.
    pub fn tap<M: PieceMover + ?Sized>(&mut self, direction: Direction, mover: &mut M) -> bool {
        self.charge = self.settings.charge_after_tap;
        self.try_shift(direction, mover)
    }

    /// Apply the lock charge policy.
    pub fn on_piece_lock(&mut self) {
        self.charge = match self.settings.lock_policy {
            LockChargePolicy::Rearm => self.settings.wall_charge,
            LockChargePolicy::Cap => self.charge.min(self.settings.wall_charge),
        };
    }

    /// Process held keys for one frame.
    pub fn handle_frame<M: PieceMover + ?Sized>(&mut self, mover: &mut M) -> RepeatAction {
        let held = self.down_held as u8 + self.left_held as u8 + self.right_held as u8;
        if held > 1 {
            self.soft_dropping = false;
            self.cells_soft_dropped = 0;
            return RepeatAction::Conflict;
        }

        if self.soft_dropping && !self.soft_dropped_last_frame {
            self.soft_dropped_last_frame = true;
            if mover.push_down(self.cells_soft_dropped) {
                self.cells_soft_dropped += 1;
                return RepeatAction::SoftDropped;
            }
            self.soft_dropping = false;
            self.cells_soft_dropped = 0;
            self.on_piece_lock();
            return RepeatAction::Locked;
        }
        let waited = self.soft_dropping;
        self.soft_dropped_last_frame = false;
        if waited {
            return RepeatAction::SoftDropWait;
        }

        if self.left_held {
            return self.handle_held(Direction::Left, mover);
        }
        if self.right_held {
            return self.handle_held(Direction::Right, mover);
        }
        RepeatAction::Idle
    }

    fn handle_held<M: PieceMover + ?Sized>(&mut self, direction: Direction, mover: &mut M) -> RepeatAction {
        let trigger = self.settings.trigger_threshold;
        self.charge = (self.charge + 1).min(trigger);
        if self.charge < trigger {
            return RepeatAction::Charging;
        }
        if self.try_shift(direction, mover) {
            self.charge = self.settings.charged_floor;
            RepeatAction::Shifted
        } else {
            RepeatAction::WallCharged
        }
    }

    fn try_shift<M: PieceMover + ?Sized>(&mut self, direction: Direction, mover: &mut M) -> bool {
        let moved = mover.shift(direction);
        if !moved {
            // Wall charge.
            self.charge = self.settings.trigger_threshold;
        }
        moved
    }
}

impl Default for AutoRepeat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A one-dimensional track: the piece can sit in `min..=max` and falls
    /// `floor` rows before locking.
    struct Track {
        x: i8,
        min: i8,
        max: i8,
        y: u32,
        floor: u32,
        locks: u32,
        last_pushdown: u32,
    }

    impl Track {
        fn new(x: i8) -> Self {
            Self {
                x,
                min: 0,
                max: 7,
                y: 0,
                floor: 18,
                locks: 0,
                last_pushdown: 0,
            }
        }
    }

    impl PieceMover for Track {
        fn shift(&mut self, direction: Direction) -> bool {
            let nx = self.x + direction.dx();
            if nx < self.min || nx > self.max {
                return false;
            }
            self.x = nx;
            true
        }

        fn push_down(&mut self, cells_soft_dropped: u32) -> bool {
            if self.y < self.floor {
                self.y += 1;
                return true;
            }
            self.locks += 1;
            self.last_pushdown = cells_soft_dropped;
            self.y = 0;
            false
        }
    }

    #[test]
    fn test_starts_charged() {
        let input = AutoRepeat::new();
        assert_eq!(input.charge(), DEFAULT_DAS_TRIGGER);
        assert!(!input.is_soft_dropping());
    }

    #[test]
    fn test_tap_resets_charge_and_shifts() {
        let mut input = AutoRepeat::new();
        let mut track = Track::new(3);
        input.press(Direction::Right);
        assert!(input.tap(Direction::Right, &mut track));
        assert_eq!(track.x, 4);
        assert_eq!(input.charge(), 0);
    }

    #[test]
    fn test_hold_charges_then_repeats_every_six_frames() {
        let mut input = AutoRepeat::new();
        let mut track = Track::new(0);
        input.press(Direction::Right);
        input.tap(Direction::Right, &mut track);
        assert_eq!(track.x, 1);

        // 15 charging frames, then the 16th triggers.
        for _ in 0..15 {
            assert_eq!(input.handle_frame(&mut track), RepeatAction::Charging);
        }
        assert_eq!(input.handle_frame(&mut track), RepeatAction::Shifted);
        assert_eq!(track.x, 2);
        assert_eq!(input.charge(), DEFAULT_DAS_CHARGED_FLOOR);

        for _ in 0..5 {
            assert_eq!(input.handle_frame(&mut track), RepeatAction::Charging);
        }
        assert_eq!(input.handle_frame(&mut track), RepeatAction::Shifted);
        assert_eq!(track.x, 3);
    }

    #[test]
    fn test_wall_keeps_full_charge() {
        let mut input = AutoRepeat::new();
        let mut track = Track::new(7);
        input.press(Direction::Right);
        assert!(!input.tap(Direction::Right, &mut track));
        assert_eq!(input.charge(), DEFAULT_DAS_TRIGGER);

        assert_eq!(input.handle_frame(&mut track), RepeatAction::WallCharged);
        assert_eq!(input.charge(), DEFAULT_DAS_TRIGGER);
    }

    #[test]
    fn test_conflicting_directions_suppress_movement() {
        let mut input = AutoRepeat::new();
        let mut track = Track::new(3);
        input.press(Direction::Left);
        input.press_down();
        input.start_soft_drop();
        assert_eq!(input.handle_frame(&mut track), RepeatAction::Conflict);
        assert!(!input.is_soft_dropping());
        assert_eq!(track.x, 3);
        assert_eq!(track.y, 0);
    }

    #[test]
    fn test_soft_drop_every_other_frame() {
        let mut input = AutoRepeat::new();
        let mut track = Track::new(3);
        input.press_down();
        input.start_soft_drop();

        assert_eq!(input.handle_frame(&mut track), RepeatAction::SoftDropped);
        assert_eq!(input.handle_frame(&mut track), RepeatAction::SoftDropWait);
        assert_eq!(input.handle_frame(&mut track), RepeatAction::SoftDropped);
        assert_eq!(track.y, 2);
        assert_eq!(input.cells_soft_dropped(), 2);
    }

    #[test]
    fn test_soft_drop_lock_resets_and_reports_pushdown() {
        let mut input = AutoRepeat::new();
        let mut track = Track::new(3);
        track.floor = 2;
        input.press_down();
        input.start_soft_drop();

        let mut outcome = RepeatAction::Idle;
        for _ in 0..10 {
            outcome = input.handle_frame(&mut track);
            if outcome == RepeatAction::Locked {
                break;
            }
        }
        assert_eq!(outcome, RepeatAction::Locked);
        assert_eq!(track.locks, 1);
        assert_eq!(track.last_pushdown, 2);
        assert!(!input.is_soft_dropping());
        assert_eq!(input.cells_soft_dropped(), 0);
    }

    #[test]
    fn test_release_down_stops_soft_drop() {
        let mut input = AutoRepeat::new();
        input.press_down();
        input.start_soft_drop();
        input.release_down();
        assert!(!input.is_soft_dropping());
        assert!(!input.is_down_held());
    }

    #[test]
    fn test_lock_policy_cap() {
        let settings = DasSettings {
            wall_charge: 12,
            ..DasSettings::default()
        };
        let mut input = AutoRepeat::with_settings(settings);
        assert_eq!(input.charge(), 16);
        input.on_piece_lock();
        assert_eq!(input.charge(), 12);

        let mut track = Track::new(3);
        input.tap(Direction::Left, &mut track);
        input.on_piece_lock();
        assert_eq!(input.charge(), 0);
    }

    #[test]
    fn test_lock_policy_rearm() {
        let settings = DasSettings::preset(DasSpeed::Standard, DasBehavior::ChargeOnPieceSpawn);
        let mut input = AutoRepeat::with_settings(settings);
        let mut track = Track::new(3);
        input.tap(Direction::Left, &mut track);
        assert_eq!(input.charge(), 0);
        input.on_piece_lock();
        assert_eq!(input.charge(), settings.wall_charge);
    }

    #[test]
    fn test_presets_are_consistent() {
        for speed in [
            DasSpeed::Standard,
            DasSpeed::SlowMedium,
            DasSpeed::Medium,
            DasSpeed::Fast,
            DasSpeed::FastDas,
        ] {
            for behavior in [
                DasBehavior::Standard,
                DasBehavior::AlwaysCharged,
                DasBehavior::ChargeOnPieceSpawn,
            ] {
                assert!(DasSettings::preset(speed, behavior).is_consistent());
            }
            assert_eq!(DasSpeed::from_str(speed.as_str()), Some(speed));
        }
    }

    #[test]
    fn test_reset_keeps_settings() {
        let settings = DasSettings::preset(DasSpeed::FastDas, DasBehavior::Standard);
        let mut input = AutoRepeat::with_settings(settings);
        input.press(Direction::Left);
        input.reset();
        assert!(!input.is_held(Direction::Left));
        assert_eq!(input.charge(), 6);
        assert_eq!(input.settings(), settings);
    }
}
