use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The parametric motion profile driving the puppet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationMode {
    /// Rest pose; parameters are reset every frame
    #[default]
    Default,
    Idle,
    Waving,
    Swimming,
    Somersault,
    ComboAttack,
}

impl AnimationMode {
    pub const ALL: [AnimationMode; 6] = [
        AnimationMode::Default,
        AnimationMode::Idle,
        AnimationMode::Waving,
        AnimationMode::Swimming,
        AnimationMode::Somersault,
        AnimationMode::ComboAttack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimationMode::Default => "default",
            AnimationMode::Idle => "idle",
            AnimationMode::Waving => "waving",
            AnimationMode::Swimming => "swimming",
            AnimationMode::Somersault => "somersault",
            AnimationMode::ComboAttack => "combo-attack",
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| Error::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for mode in AnimationMode::ALL {
            assert_eq!(mode.name().parse::<AnimationMode>().unwrap(), mode);
        }
        assert_eq!("Combo_Attack".parse::<AnimationMode>().unwrap(), AnimationMode::ComboAttack);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "moonwalk".parse::<AnimationMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown animation mode 'moonwalk'");
    }
}
