// Player animation state as the host animator sees it

use super::info::BindingSet;

/// Gameplay modes, each with its own set of action animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplayMode {
    Default,
    Brawl,
    Running,
    Falling,
}

impl GameplayMode {
    pub const ALL: [GameplayMode; 4] = [
        GameplayMode::Default,
        GameplayMode::Brawl,
        GameplayMode::Running,
        GameplayMode::Falling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Brawl => "brawl",
            Self::Running => "running",
            Self::Falling => "falling",
        }
    }
}

/// Action animation slots for one gameplay mode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionStateAnim {
    pub intro: String,
    pub intro_duration: f32,
    pub air_block: String,
    pub ground_block: String,
    pub idle: String,
    pub side_switch: String,
    pub high_attacks: Vec<String>,
    pub low_attacks: Vec<String>,
    pub jumps: Vec<String>,
    pub lands: Vec<String>,
    pub hurts: Vec<String>,
    pub has_slams: bool,
    pub ignore_slams: bool,
    pub slam_attacks: Vec<String>,
}

impl From<&BindingSet> for ActionStateAnim {
    /// Field-for-field copy; destructuring keeps the copy total
    fn from(bindings: &BindingSet) -> Self {
        let BindingSet {
            intro,
            intro_duration,
            air_block,
            ground_block,
            idle,
            side_switch,
            high_attacks,
            low_attacks,
            jumps,
            lands,
            hurts,
            has_slams,
            ignore_slams,
            slam_attacks,
        } = bindings.clone();

        Self {
            intro,
            intro_duration,
            air_block,
            ground_block,
            idle,
            side_switch,
            high_attacks,
            low_attacks,
            jumps,
            lands,
            hurts,
            has_slams,
            ignore_slams,
            slam_attacks,
        }
    }
}

/// The four per-mode action states of a player animator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionStateAnims {
    pub default: ActionStateAnim,
    pub brawl: ActionStateAnim,
    pub running: ActionStateAnim,
    pub falling: ActionStateAnim,
}

impl ActionStateAnims {
    pub fn get(&self, mode: GameplayMode) -> &ActionStateAnim {
        match mode {
            GameplayMode::Default => &self.default,
            GameplayMode::Brawl => &self.brawl,
            GameplayMode::Running => &self.running,
            GameplayMode::Falling => &self.falling,
        }
    }

    pub fn set(&mut self, mode: GameplayMode, anim: ActionStateAnim) {
        match mode {
            GameplayMode::Default => self.default = anim,
            GameplayMode::Brawl => self.brawl = anim,
            GameplayMode::Running => self.running = anim,
            GameplayMode::Falling => self.falling = anim,
        }
    }

    /// Every clip name referenced by any mode, for diagnostics
    pub fn referenced_clips(&self) -> Vec<&str> {
        let mut clips: Vec<&str> = GameplayMode::ALL
            .iter()
            .flat_map(|mode| {
                let anim = self.get(*mode);
                [
                    anim.intro.as_str(),
                    anim.air_block.as_str(),
                    anim.ground_block.as_str(),
                    anim.idle.as_str(),
                    anim.side_switch.as_str(),
                ]
                .into_iter()
                .chain(anim.high_attacks.iter().map(String::as_str))
                .chain(anim.low_attacks.iter().map(String::as_str))
                .chain(anim.jumps.iter().map(String::as_str))
                .chain(anim.lands.iter().map(String::as_str))
                .chain(anim.hurts.iter().map(String::as_str))
                .chain(anim.slam_attacks.iter().map(String::as_str))
            })
            .filter(|clip| !clip.is_empty())
            .collect();
        clips.sort_unstable();
        clips.dedup();
        clips
    }
}
