//! # User Profile
//!
//! Three categorical selections that parameterize the system prompt. Each is
//! optional; an unset selection interpolates as the empty string. The wire
//! values (`"oily"`, `"weightLoss"`, ...) are what the model sees.

use std::fmt;

use crate::inference::Message;

/// Defines a selection enum with its wire value and display label.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $placeholder:expr, {
            $($variant:ident => ($value:expr, $label:expr),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];
            /// Label shown while nothing is selected.
            pub const PLACEHOLDER: &'static str = $placeholder;

            /// The value interpolated into the system prompt.
            pub fn value(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parses a wire value. Unknown values yield `None`.
            pub fn from_value(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|c| c.value() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    SkinType, "Select Skin Type", {
        Oily => ("oily", "Oily"),
        Dry => ("dry", "Dry"),
        Combination => ("combination", "Combination"),
        Sensitive => ("sensitive", "Sensitive"),
        Normal => ("normal", "Normal"),
    }
}

choice_enum! {
    FitnessGoal, "Select Fitness Goal", {
        WeightLoss => ("weightLoss", "Weight Loss"),
        MuscleGain => ("muscleGain", "Muscle Gain"),
        Endurance => ("endurance", "Endurance"),
        Flexibility => ("flexibility", "Flexibility"),
        General => ("general", "General Fitness"),
    }
}

choice_enum! {
    ActivityLevel, "Select Activity Level", {
        Sedentary => ("sedentary", "Sedentary"),
        Light => ("light", "Light Active"),
        Moderate => ("moderate", "Moderately Active"),
        Very => ("very", "Very Active"),
        Extreme => ("extreme", "Extremely Active"),
    }
}

/// Which selector a profile action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    SkinType,
    FitnessGoal,
    ActivityLevel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub skin_type: Option<SkinType>,
    pub fitness_goal: Option<FitnessGoal>,
    pub activity_level: Option<ActivityLevel>,
    /// Collected but never sent to the model.
    pub skin_concerns: Vec<String>,
}

/// Steps through `None → ALL[0] → ... → ALL[n-1] → None`.
fn cycle<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(c) => all
            .iter()
            .position(|x| *x == c)
            .and_then(|i| all.get(i + 1))
            .copied(),
    }
}

impl UserProfile {
    /// Advances one selector to its next option, wrapping back to unset.
    pub fn cycle(&mut self, field: ProfileField) {
        match field {
            ProfileField::SkinType => self.skin_type = cycle(self.skin_type, SkinType::ALL),
            ProfileField::FitnessGoal => {
                self.fitness_goal = cycle(self.fitness_goal, FitnessGoal::ALL)
            }
            ProfileField::ActivityLevel => {
                self.activity_level = cycle(self.activity_level, ActivityLevel::ALL)
            }
        }
    }

    /// Display label for one selector (placeholder when unset).
    pub fn label(&self, field: ProfileField) -> &'static str {
        match field {
            ProfileField::SkinType => self.skin_type.map_or(SkinType::PLACEHOLDER, |c| c.label()),
            ProfileField::FitnessGoal => self
                .fitness_goal
                .map_or(FitnessGoal::PLACEHOLDER, |c| c.label()),
            ProfileField::ActivityLevel => self
                .activity_level
                .map_or(ActivityLevel::PLACEHOLDER, |c| c.label()),
        }
    }

    pub fn is_set(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::SkinType => self.skin_type.is_some(),
            ProfileField::FitnessGoal => self.fitness_goal.is_some(),
            ProfileField::ActivityLevel => self.activity_level.is_some(),
        }
    }

    /// Builds the system-role message sent ahead of every request.
    pub fn system_message(&self) -> Message {
        Message::system(system_prompt(self))
    }
}

/// Interpolates the profile into the fixed coaching instructions.
pub fn system_prompt(profile: &UserProfile) -> String {
    format!(
        "You are a helpful and knowledgeable health coach specializing in skincare and fitness. \
         Keep responses under 200 words. Consider the user's profile - Skin Type: {}, \
         Fitness Goals: {}, Activity Level: {}. For skincare, focus on ingredient \
         recommendations and daily routines specific to their skin type. For fitness, \
         provide specific exercise suggestions and form tips aligned with their goals and \
         activity level. Always maintain a supportive, encouraging tone. When you want to \
         emphasize text, use markdown bold with single underscores like _this_ instead of \
         asterisks.",
        profile.skin_type.map_or("", |c| c.value()),
        profile.fitness_goal.map_or("", |c| c.value()),
        profile.activity_level.map_or("", |c| c.value()),
    )
}

/// Outbound message list: the profile's system message, then the transcript.
pub fn outbound_messages(profile: &UserProfile, history: &[Message]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(profile.system_message());
    messages.extend_from_slice(history);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::Role;

    #[test]
    fn test_prompt_contains_all_three_values() {
        let profile = UserProfile {
            skin_type: Some(SkinType::Oily),
            fitness_goal: Some(FitnessGoal::WeightLoss),
            activity_level: Some(ActivityLevel::Moderate),
            skin_concerns: Vec::new(),
        };
        let prompt = system_prompt(&profile);
        assert!(prompt.contains("oily"));
        assert!(prompt.contains("weightLoss"));
        assert!(prompt.contains("moderate"));
        assert!(prompt.contains("Skin Type: oily, Fitness Goals: weightLoss, Activity Level: moderate."));
    }

    #[test]
    fn test_empty_profile_prompt_is_well_formed() {
        let prompt = system_prompt(&UserProfile::default());
        assert!(prompt.starts_with("You are a helpful and knowledgeable health coach"));
        assert!(prompt.contains("Skin Type: , Fitness Goals: , Activity Level: ."));
        assert!(!prompt.contains("undefined"));
        assert!(!prompt.contains("None"));
        assert!(!prompt.contains("{}"));
    }

    #[test]
    fn test_skin_concerns_never_reach_prompt() {
        let profile = UserProfile {
            skin_concerns: vec!["rosacea".to_string()],
            ..Default::default()
        };
        assert!(!system_prompt(&profile).contains("rosacea"));
    }

    #[test]
    fn test_from_value_round_trips_and_rejects_unknown() {
        for goal in FitnessGoal::ALL {
            assert_eq!(FitnessGoal::from_value(goal.value()), Some(*goal));
        }
        assert_eq!(SkinType::from_value("scaly"), None);
        assert_eq!(ActivityLevel::from_value(""), None);
    }

    #[test]
    fn test_cycle_wraps_through_unset() {
        let mut profile = UserProfile::default();
        profile.cycle(ProfileField::SkinType);
        assert_eq!(profile.skin_type, Some(SkinType::Oily));
        for _ in 0..SkinType::ALL.len() - 1 {
            profile.cycle(ProfileField::SkinType);
        }
        assert_eq!(profile.skin_type, Some(SkinType::Normal));
        profile.cycle(ProfileField::SkinType);
        assert_eq!(profile.skin_type, None);
        // Other selectors untouched
        assert_eq!(profile.fitness_goal, None);
        assert_eq!(profile.activity_level, None);
    }

    #[test]
    fn test_labels_fall_back_to_placeholders() {
        let mut profile = UserProfile::default();
        assert_eq!(profile.label(ProfileField::ActivityLevel), "Select Activity Level");
        profile.activity_level = Some(ActivityLevel::Light);
        assert_eq!(profile.label(ProfileField::ActivityLevel), "Light Active");
    }

    #[test]
    fn test_outbound_messages_prepend_system() {
        let history = vec![Message::assistant("hi"), Message::user("help")];
        let outbound = outbound_messages(&UserProfile::default(), &history);
        assert_eq!(outbound.len(), 3);
        assert_eq!(outbound[0].role, Role::System);
        assert_eq!(&outbound[1..], &history[..]);
    }
}
