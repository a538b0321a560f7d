// Character metadata carried in a package

use serde::{Deserialize, Serialize};

/// Malformed character info JSON
#[derive(Debug, thiserror::Error)]
#[error("Malformed character info: {0}")]
pub struct InfoParseError(#[from] serde_json::Error);

/// Animation slot kinds a binding set can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationSlot {
    Intro,
    AirBlock,
    GroundBlock,
    Idle,
    SideSwitch,
    HighAttacks,
    LowAttacks,
    Jumps,
    Lands,
    Hurts,
    Slams,
}

impl AnimationSlot {
    pub const ALL: [AnimationSlot; 11] = [
        AnimationSlot::Intro,
        AnimationSlot::AirBlock,
        AnimationSlot::GroundBlock,
        AnimationSlot::Idle,
        AnimationSlot::SideSwitch,
        AnimationSlot::HighAttacks,
        AnimationSlot::LowAttacks,
        AnimationSlot::Jumps,
        AnimationSlot::Lands,
        AnimationSlot::Hurts,
        AnimationSlot::Slams,
    ];
}

/// Animation clip assignments for one gameplay mode
///
/// Missing JSON keys fall back to the authoring defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BindingSet {
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

impl Default for BindingSet {
    fn default() -> Self {
        Self {
            intro: "Intro".to_string(),
            intro_duration: 2.0,
            air_block: "AirBlock".to_string(),
            ground_block: "GroundBlock".to_string(),
            idle: "Idle".to_string(),
            side_switch: "SideSwitch".to_string(),
            high_attacks: vec!["AttackHigh1".to_string()],
            low_attacks: vec!["AttackLow1".to_string()],
            jumps: vec!["Jump1".to_string()],
            lands: vec!["Land1".to_string()],
            hurts: vec!["Hurt1".to_string()],
            has_slams: false,
            ignore_slams: false,
            slam_attacks: Vec::new(),
        }
    }
}

impl BindingSet {
    /// Check whether the set provides an animation for a slot
    pub fn has_state(&self, slot: AnimationSlot) -> bool {
        match slot {
            AnimationSlot::Intro => !self.intro.is_empty(),
            AnimationSlot::AirBlock => !self.air_block.is_empty(),
            AnimationSlot::GroundBlock => !self.ground_block.is_empty(),
            AnimationSlot::Idle => !self.idle.is_empty(),
            AnimationSlot::SideSwitch => !self.side_switch.is_empty(),
            AnimationSlot::HighAttacks => !self.high_attacks.is_empty(),
            AnimationSlot::LowAttacks => !self.low_attacks.is_empty(),
            AnimationSlot::Jumps => !self.jumps.is_empty(),
            AnimationSlot::Lands => !self.lands.is_empty(),
            AnimationSlot::Hurts => !self.hurts.is_empty(),
            AnimationSlot::Slams => self.has_slams && !self.slam_attacks.is_empty(),
        }
    }
}

/// Character metadata: identity plus one binding set per gameplay mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CharacterInfo {
    /// Registry key
    pub name: String,
    pub author: String,
    pub overwrite_all_sprite_renderer_materials: bool,
    #[serde(rename = "DefaultAnimationBindings")]
    pub default_bindings: BindingSet,
    #[serde(rename = "BrawlAnimationBindings")]
    pub brawl_bindings: BindingSet,
    #[serde(rename = "RunningAnimationBindings")]
    pub running_bindings: BindingSet,
    #[serde(rename = "FallingAnimationBindings")]
    pub falling_bindings: BindingSet,
}

impl Default for CharacterInfo {
    fn default() -> Self {
        Self {
            name: "Beat".to_string(),
            author: "D-Cell".to_string(),
            overwrite_all_sprite_renderer_materials: false,
            default_bindings: BindingSet::default(),
            brawl_bindings: BindingSet::default(),
            running_bindings: BindingSet::default(),
            falling_bindings: BindingSet::default(),
        }
    }
}

impl CharacterInfo {
    /// Parse character info from package JSON
    pub fn from_json(json: &str) -> Result<Self, InfoParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for embedding in a package
    pub fn to_json(&self) -> Result<String, InfoParseError> {
        Ok(serde_json::to_string(self)?)
    }
}
